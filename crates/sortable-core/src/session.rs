//! Drag session state.

use crate::collection::{CollectionName, ItemId};
use crate::lookup;
use crate::store::StoreState;
use uuid::Uuid;

/// One in-progress drag, alive between a drag start and its end or cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Session identifier, used to correlate log lines.
    pub session_id: Uuid,
    /// The item being dragged.
    pub dragged_id: ItemId,
    /// Collection the item was picked up from.
    pub source_collection: CollectionName,
    /// Index within the source collection at pickup.
    pub source_index: usize,
    /// Full store copy taken at pickup, restored on cancel.
    pub pre_session_snapshot: StoreState,
    /// Last resolved hover token, cleared when hovering nothing.
    pub last_over_id: Option<String>,
}

impl DragSession {
    /// Open a session for `id` against the current state.
    ///
    /// Returns `None` if `id` is not an item of any collection.
    pub fn open(state: &StoreState, id: &str) -> Option<Self> {
        let source_collection = lookup::resolve(state, id)?;
        let source_index = state.get(source_collection.as_str()).ok()?.index_of(id)?;
        Some(Self {
            session_id: Uuid::new_v4(),
            dragged_id: ItemId::new(id),
            source_collection,
            source_index,
            pre_session_snapshot: state.clone(),
            last_over_id: None,
        })
    }

    /// Check if this session drags `id`.
    pub fn drags(&self, id: &str) -> bool {
        self.dragged_id.as_str() == id
    }
}

/// The drag state machine's phase.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragPhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// A drag is in flight.
    Dragging(DragSession),
}

impl DragPhase {
    /// Check if a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Dragging(session) => Some(session),
            Self::Idle => None,
        }
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut DragSession> {
        match self {
            Self::Dragging(session) => Some(session),
            Self::Idle => None,
        }
    }

    /// Close the session, returning it.
    pub(crate) fn take(&mut self) -> Option<DragSession> {
        match std::mem::take(self) {
            Self::Dragging(session) => Some(session),
            Self::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;

    fn state() -> StoreState {
        StoreState::from_collections([
            Collection::new("options", ["A1", "A2", "A3"]),
            Collection::empty("chosen"),
        ])
        .unwrap()
    }

    #[test]
    fn test_open_records_source() {
        let session = DragSession::open(&state(), "A2").unwrap();
        assert_eq!(session.source_collection.as_str(), "options");
        assert_eq!(session.source_index, 1);
        assert_eq!(session.pre_session_snapshot, state());
        assert!(session.last_over_id.is_none());
        assert!(session.drags("A2"));
        assert!(!session.drags("A1"));
    }

    #[test]
    fn test_open_unknown_item() {
        assert!(DragSession::open(&state(), "ghost").is_none());
        // A collection name is not a draggable item.
        assert!(DragSession::open(&state(), "chosen").is_none());
    }

    #[test]
    fn test_phase_take_returns_to_idle() {
        let mut phase = DragPhase::Dragging(DragSession::open(&state(), "A1").unwrap());
        assert!(phase.is_dragging());
        assert!(phase.take().is_some());
        assert_eq!(phase, DragPhase::Idle);
        assert!(phase.take().is_none());
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        let a = DragSession::open(&state(), "A1").unwrap();
        let b = DragSession::open(&state(), "A1").unwrap();
        assert_ne!(a.session_id, b.session_id);
    }
}

//! Drag controller: the event-driven state machine over an injected store.
//!
//! The controller owns the [`CollectionStore`] for its lifetime. While a drag
//! is open it is the only writer; hover previews, the drop-time reorder and
//! cancellation all go through [`CollectionStore::replace_all`].
//!
//! Every event is handled synchronously. Stray or mismatched events are
//! reported as [`DragOutcome::Ignored`] and never change state.

use crate::announce::{DragNotice, DragObserver};
use crate::collection::ItemId;
use crate::config::{ControllerConfig, RestartPolicy};
use crate::error::{DragError, DragResult, StoreError, StoreResult};
use crate::event::{DragEvent, DragOutcome};
use crate::lookup::{self, OverTarget};
use crate::reorder::{self, array_move};
use crate::session::{DragPhase, DragSession};
use crate::store::{CollectionStore, StoreState};
use std::fmt;
use uuid::Uuid;

/// Compute the same-collection drop arrangement for `id` dropped on `over`.
///
/// Returns `None` when the drop needs no further mutation: nothing hovered,
/// an unresolvable side, a cross-collection drop (already placed by the hover
/// preview), or a drop back onto the item's own position. Dropping onto the
/// containing collection's own zone moves the item to the end.
pub fn compute_drop(state: &StoreState, id: &str, over: Option<&str>) -> Option<StoreState> {
    let active = lookup::resolve(state, id)?;
    let target = OverTarget::resolve(state, over);
    if target.collection() != Some(&active) {
        return None;
    }

    let collection = state.get(active.as_str()).ok()?;
    let from = collection.index_of(id)?;
    let to = match &target {
        OverTarget::Item { id: over_id, .. } => collection.index_of(over_id.as_str())?,
        OverTarget::Container(_) => collection.len() - 1,
        OverTarget::None => return None,
    };
    if from == to {
        return None;
    }

    let mut next = state.clone();
    array_move(&mut next.get_mut(active.as_str()).ok()?.items, from, to);
    Some(next)
}

/// Routes drag events to the reorder engine and commits or rolls back.
pub struct DragController {
    store: CollectionStore,
    phase: DragPhase,
    config: ControllerConfig,
    observers: Vec<Box<dyn DragObserver>>,
}

impl fmt::Debug for DragController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragController")
            .field("store", &self.store)
            .field("phase", &self.phase)
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl DragController {
    /// Create a controller over a host-constructed store.
    pub fn new(store: CollectionStore) -> Self {
        Self::with_config(store, ControllerConfig::default())
    }

    /// Create a controller with explicit settings.
    pub fn with_config(store: CollectionStore, config: ControllerConfig) -> Self {
        Self {
            store,
            phase: DragPhase::Idle,
            config,
            observers: Vec::new(),
        }
    }

    /// Register an observer for accepted events.
    pub fn add_observer(&mut self, observer: impl DragObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Current arrangement, for re-rendering after every event.
    pub fn current_state(&self) -> &StoreState {
        self.store.current_state()
    }

    /// The owned store.
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// Hand the store back to the host.
    pub fn into_store(self) -> CollectionStore {
        self.store
    }

    /// Controller settings.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Current drag phase.
    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// Item currently being dragged, for the drag overlay.
    pub fn active_id(&self) -> Option<&ItemId> {
        self.phase.session().map(|s| &s.dragged_id)
    }

    /// Check if `id` is the item currently being dragged.
    pub fn is_dragging(&self, id: &str) -> bool {
        self.phase.session().is_some_and(|s| s.drags(id))
    }

    /// Edit the store outside a drag (adding or removing items, etc.).
    ///
    /// Refused with [`StoreError::SessionOpen`] while a session is open.
    pub fn edit_store<T>(
        &mut self,
        edit: impl FnOnce(&mut CollectionStore) -> StoreResult<T>,
    ) -> StoreResult<T> {
        if self.phase.is_dragging() {
            return Err(StoreError::SessionOpen);
        }
        edit(&mut self.store)
    }

    /// Handle one event from the input layer.
    pub fn handle(&mut self, event: &DragEvent) -> DragOutcome {
        let result = match event {
            DragEvent::Start { id } => self.start(id),
            DragEvent::Over { id, over } => self.over(id, over.as_deref()),
            DragEvent::End { id, over } => self.end(id, over.as_deref()),
            DragEvent::Cancel { id } => self.cancel(id),
        };
        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                log::debug!("Ignoring {:?}: {}", event, err);
                DragOutcome::Ignored(err)
            }
        }
    }

    /// Pick up `id`.
    pub fn drag_start(&mut self, id: &str) -> DragOutcome {
        self.handle(&DragEvent::start(id))
    }

    /// Hover `id` over `over`, or over nothing.
    pub fn drag_over(&mut self, id: &str, over: Option<&str>) -> DragOutcome {
        self.handle(&DragEvent::over(id, over))
    }

    /// Drop `id` on `over`, committing the arrangement.
    pub fn drag_end(&mut self, id: &str, over: Option<&str>) -> DragOutcome {
        self.handle(&DragEvent::end(id, over))
    }

    /// Abort the drag of `id`, restoring the pre-drag arrangement.
    pub fn drag_cancel(&mut self, id: &str) -> DragOutcome {
        self.handle(&DragEvent::cancel(id))
    }

    fn start(&mut self, id: &str) -> DragResult<DragOutcome> {
        let (restored_from, open_id) = match self.phase.session() {
            Some(open) => (
                open.pre_session_snapshot.clone(),
                Some(open.dragged_id.clone()),
            ),
            None => (self.store.snapshot(), None),
        };
        if let Some(open_id) = &open_id {
            if self.config.restart_policy == RestartPolicy::Ignore {
                return Err(DragError::InvalidSession(format!(
                    "drag of {open_id} already in progress"
                )));
            }
        }

        // Resolve against the state the session will start from, before any
        // rollback, so an unknown id leaves the open drag untouched.
        let session = DragSession::open(&restored_from, id)
            .ok_or_else(|| DragError::NotFound(id.to_string()))?;

        let changed = match open_id {
            Some(open_id) => self.cancel(open_id.as_str())?.changed(),
            None => false,
        };

        let notice = DragNotice::PickedUp {
            session_id: session.session_id,
            id: session.dragged_id.clone(),
            collection: session.source_collection.clone(),
            index: session.source_index,
        };
        self.phase = DragPhase::Dragging(session);
        self.notify(&notice);
        Ok(DragOutcome::Started { changed })
    }

    fn over(&mut self, id: &str, over: Option<&str>) -> DragResult<DragOutcome> {
        let session_id = self.open_session(id)?;
        let outcome = match reorder::plan_preview(self.store.current_state(), id, over) {
            Some(planned) => {
                let next = reorder::apply_preview(self.store.current_state(), &planned);
                self.store.replace_all(next)?;
                log::debug!(
                    "[drag {}] preview {} from {} to {} at {}",
                    session_id,
                    planned.id,
                    planned.from,
                    planned.to,
                    planned.index
                );
                DragOutcome::Previewed
            }
            None => DragOutcome::Unchanged,
        };
        if let Some(session) = self.phase.session_mut() {
            session.last_over_id = over.map(str::to_string);
        }

        self.notify(&DragNotice::MovedOver {
            session_id,
            id: ItemId::new(id),
            over: over.map(str::to_string),
        });
        Ok(outcome)
    }

    fn end(&mut self, id: &str, over: Option<&str>) -> DragResult<DragOutcome> {
        let session_id = self.open_session(id)?;
        let changed = match compute_drop(self.store.current_state(), id, over) {
            Some(next) => {
                self.store.replace_all(next)?;
                true
            }
            None => false,
        };
        self.phase.take();

        self.notify(&DragNotice::Dropped {
            session_id,
            id: ItemId::new(id),
            over: over.map(str::to_string),
        });
        Ok(DragOutcome::Committed { changed })
    }

    fn cancel(&mut self, id: &str) -> DragResult<DragOutcome> {
        self.open_session(id)?;
        let Some(session) = self.phase.take() else {
            return Err(DragError::InvalidSession(format!("no drag in progress for {id}")));
        };
        let changed = self.store.current_state() != &session.pre_session_snapshot;
        self.store.replace_all(session.pre_session_snapshot)?;

        self.notify(&DragNotice::Cancelled {
            session_id: session.session_id,
            id: session.dragged_id,
        });
        Ok(DragOutcome::Cancelled { changed })
    }

    /// Check that a session is open for `id`, returning its session id.
    fn open_session(&self, id: &str) -> DragResult<Uuid> {
        match self.phase.session() {
            None => Err(DragError::InvalidSession(format!(
                "no drag in progress for {id}"
            ))),
            Some(session) if !session.drags(id) => Err(DragError::InvalidSession(format!(
                "{id} is not the dragged item {}",
                session.dragged_id
            ))),
            Some(session) => Ok(session.session_id),
        }
    }

    fn notify(&mut self, notice: &DragNotice) {
        for observer in &mut self.observers {
            observer.notify(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::Announcements;
    use crate::collection::Collection;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ids(items: &[&str]) -> Vec<ItemId> {
        items.iter().map(|&id| ItemId::from(id)).collect()
    }

    fn items(controller: &DragController, name: &str) -> Vec<ItemId> {
        controller.current_state().get(name).unwrap().items.clone()
    }

    fn options_and_chosen() -> DragController {
        let store = CollectionStore::from_collections([
            Collection::new("options", ["A1", "A2", "A3"]),
            Collection::empty("chosen"),
        ])
        .unwrap();
        DragController::new(store)
    }

    fn single_list() -> DragController {
        let store =
            CollectionStore::from_collections([Collection::new("list", ["A1", "A2", "A3"])])
                .unwrap();
        DragController::new(store)
    }

    #[test]
    fn test_cross_collection_drag() {
        let mut controller = options_and_chosen();

        assert_eq!(
            controller.drag_start("A2"),
            DragOutcome::Started { changed: false }
        );
        assert_eq!(controller.active_id(), Some(&ItemId::from("A2")));

        assert_eq!(
            controller.drag_over("A2", Some("chosen")),
            DragOutcome::Previewed
        );
        assert_eq!(items(&controller, "options"), ids(&["A1", "A3"]));
        assert_eq!(items(&controller, "chosen"), ids(&["A2"]));

        assert_eq!(
            controller.drag_end("A2", Some("chosen")),
            DragOutcome::Committed { changed: false }
        );
        assert_eq!(items(&controller, "options"), ids(&["A1", "A3"]));
        assert_eq!(items(&controller, "chosen"), ids(&["A2"]));
        assert!(!controller.phase().is_dragging());
        assert!(controller.active_id().is_none());
    }

    #[test]
    fn test_same_collection_reorder() {
        let mut controller = single_list();
        let before = controller.current_state().clone();

        controller.drag_start("A1");
        assert_eq!(controller.drag_over("A1", Some("A1")), DragOutcome::Unchanged);
        assert_eq!(controller.current_state(), &before);

        assert_eq!(
            controller.drag_end("A1", Some("A3")),
            DragOutcome::Committed { changed: true }
        );
        assert_eq!(items(&controller, "list"), ids(&["A2", "A3", "A1"]));
    }

    #[test]
    fn test_drop_on_own_position_keeps_order() {
        let mut controller = single_list();
        controller.drag_start("A2");
        assert_eq!(
            controller.drag_end("A2", Some("A2")),
            DragOutcome::Committed { changed: false }
        );
        assert_eq!(items(&controller, "list"), ids(&["A1", "A2", "A3"]));
    }

    #[test]
    fn test_drop_on_own_container_moves_to_end() {
        let mut controller = single_list();
        controller.drag_start("A1");
        controller.drag_end("A1", Some("list"));
        assert_eq!(items(&controller, "list"), ids(&["A2", "A3", "A1"]));
    }

    #[test]
    fn test_unresolvable_target() {
        let mut controller = single_list();
        let before = controller.current_state().clone();
        controller.drag_start("A1");

        assert_eq!(controller.drag_over("A1", Some("ghost")), DragOutcome::Unchanged);
        assert_eq!(controller.current_state(), &before);
        assert_eq!(
            controller.phase().session().unwrap().last_over_id.as_deref(),
            Some("ghost")
        );

        assert_eq!(
            controller.drag_end("A1", Some("ghost")),
            DragOutcome::Committed { changed: false }
        );
        assert_eq!(controller.current_state(), &before);
    }

    #[test]
    fn test_hover_nothing_clears_last_over() {
        let mut controller = options_and_chosen();
        controller.drag_start("A1");
        controller.drag_over("A1", Some("chosen"));
        assert_eq!(
            controller.phase().session().unwrap().last_over_id.as_deref(),
            Some("chosen")
        );

        let after_preview = controller.current_state().clone();
        assert_eq!(controller.drag_over("A1", None), DragOutcome::Unchanged);
        assert!(controller.phase().session().unwrap().last_over_id.is_none());
        assert_eq!(controller.current_state(), &after_preview);
    }

    #[test]
    fn test_drop_on_nothing_keeps_last_preview() {
        let mut controller = options_and_chosen();
        controller.drag_start("A3");
        controller.drag_over("A3", Some("chosen"));
        assert_eq!(
            controller.drag_end("A3", None),
            DragOutcome::Committed { changed: false }
        );
        assert_eq!(items(&controller, "chosen"), ids(&["A3"]));
    }

    #[test]
    fn test_cancel_restores_pre_drag_state() {
        let mut controller = options_and_chosen();
        let before = controller.current_state().clone();

        controller.drag_start("A1");
        controller.drag_over("A1", Some("chosen"));
        controller.drag_over("A1", Some("A3"));
        controller.drag_over("A1", Some("A1"));
        assert_ne!(controller.current_state(), &before);

        assert_eq!(
            controller.drag_cancel("A1"),
            DragOutcome::Cancelled { changed: true }
        );
        assert_eq!(controller.current_state(), &before);
        assert!(!controller.phase().is_dragging());
    }

    #[test]
    fn test_preview_can_return_to_source() {
        let mut controller = options_and_chosen();
        controller.drag_start("A1");
        controller.drag_over("A1", Some("chosen"));
        assert_eq!(items(&controller, "chosen"), ids(&["A1"]));

        controller.drag_over("A1", Some("A3"));
        assert_eq!(items(&controller, "options"), ids(&["A2", "A1", "A3"]));
        assert!(items(&controller, "chosen").is_empty());

        controller.drag_end("A1", Some("A3"));
        assert_eq!(items(&controller, "options"), ids(&["A2", "A3", "A1"]));
    }

    #[test]
    fn test_stray_events_are_ignored() {
        let mut controller = options_and_chosen();
        let before = controller.current_state().clone();

        assert!(controller.drag_over("A1", Some("chosen")).is_ignored());
        assert!(controller.drag_end("A1", Some("chosen")).is_ignored());
        assert!(controller.drag_cancel("A1").is_ignored());
        assert!(matches!(
            controller.drag_start("ghost"),
            DragOutcome::Ignored(DragError::NotFound(_))
        ));
        assert!(controller.drag_start("chosen").is_ignored());

        controller.drag_start("A1");
        assert!(matches!(
            controller.drag_over("A2", Some("chosen")),
            DragOutcome::Ignored(DragError::InvalidSession(_))
        ));
        assert!(controller.drag_end("A2", Some("chosen")).is_ignored());
        assert!(controller.drag_cancel("A3").is_ignored());

        assert_eq!(controller.current_state(), &before);
        assert!(controller.is_dragging("A1"));
    }

    #[test]
    fn test_stray_over_after_end() {
        let mut controller = options_and_chosen();
        controller.drag_start("A1");
        controller.drag_end("A1", Some("A1"));
        let committed = controller.current_state().clone();

        assert!(controller.drag_over("A1", Some("chosen")).is_ignored());
        assert_eq!(controller.current_state(), &committed);
    }

    #[test]
    fn test_second_start_ignored_by_default() {
        let mut controller = options_and_chosen();
        controller.drag_start("A1");
        controller.drag_over("A1", Some("chosen"));

        assert!(controller.drag_start("A2").is_ignored());
        assert!(controller.is_dragging("A1"));
        assert_eq!(items(&controller, "chosen"), ids(&["A1"]));
    }

    #[test]
    fn test_second_start_cancels_and_restarts() {
        let store = CollectionStore::from_collections([
            Collection::new("options", ["A1", "A2", "A3"]),
            Collection::empty("chosen"),
        ])
        .unwrap();
        let config = ControllerConfig {
            restart_policy: RestartPolicy::CancelAndRestart,
        };
        let mut controller = DragController::with_config(store, config);
        let before = controller.current_state().clone();

        controller.drag_start("A1");
        controller.drag_over("A1", Some("chosen"));
        assert_eq!(
            controller.drag_start("A2"),
            DragOutcome::Started { changed: true }
        );
        assert_eq!(controller.current_state(), &before);
        assert!(controller.is_dragging("A2"));

        let session = controller.phase().session().unwrap();
        assert_eq!(session.source_index, 1);
    }

    #[test]
    fn test_restart_with_unknown_id_keeps_open_drag() {
        let store = CollectionStore::from_collections([
            Collection::new("options", ["A1", "A2", "A3"]),
            Collection::empty("chosen"),
        ])
        .unwrap();
        let config = ControllerConfig {
            restart_policy: RestartPolicy::CancelAndRestart,
        };
        let mut controller = DragController::with_config(store, config);

        controller.drag_start("A1");
        controller.drag_over("A1", Some("chosen"));
        let previewed = controller.current_state().clone();
        let revision = controller.store().revision();

        assert!(matches!(
            controller.drag_start("ghost"),
            DragOutcome::Ignored(DragError::NotFound(_))
        ));
        assert_eq!(controller.current_state(), &previewed);
        assert_eq!(controller.store().revision(), revision);
        assert!(controller.is_dragging("A1"));
        assert_eq!(items(&controller, "chosen"), ids(&["A1"]));
    }

    #[test]
    fn test_restart_resolves_against_pre_drag_state() {
        let store = CollectionStore::from_collections([
            Collection::new("options", ["A1", "A2", "A3"]),
            Collection::new("chosen", ["B1"]),
        ])
        .unwrap();
        let config = ControllerConfig {
            restart_policy: RestartPolicy::CancelAndRestart,
        };
        let mut controller = DragController::with_config(store, config);

        controller.drag_start("A1");
        controller.drag_over("A1", Some("B1"));
        assert_eq!(
            controller.drag_start("A3"),
            DragOutcome::Started { changed: true }
        );
        let session = controller.phase().session().unwrap();
        assert_eq!(session.source_collection.as_str(), "options");
        assert_eq!(session.source_index, 2);
        assert_eq!(&session.pre_session_snapshot, controller.current_state());
    }

    #[test]
    fn test_ignored_hover_leaves_last_over_untouched() {
        let mut controller = options_and_chosen();
        controller.drag_start("A1");
        controller.drag_over("A1", Some("chosen"));

        assert!(controller.drag_over("A2", Some("A3")).is_ignored());
        assert_eq!(
            controller.phase().session().unwrap().last_over_id.as_deref(),
            Some("chosen")
        );
    }

    #[test]
    fn test_edit_store_refused_while_dragging() {
        let mut controller = options_and_chosen();
        controller
            .edit_store(|store| store.insert_item("chosen", "B1", None))
            .unwrap();
        assert_eq!(items(&controller, "chosen"), ids(&["B1"]));

        controller.drag_start("A1");
        assert_eq!(
            controller.edit_store(|store| store.remove_item("B1")),
            Err(StoreError::SessionOpen)
        );
        controller.drag_cancel("A1");
        assert!(controller.edit_store(|store| store.remove_item("B1")).is_ok());
    }

    #[test]
    fn test_observers_see_accepted_events() {
        let announcements = Rc::new(RefCell::new(Announcements::new()));
        let mut controller = options_and_chosen();
        controller.add_observer(announcements.clone());

        controller.drag_over("A2", Some("chosen"));
        controller.drag_start("A2");
        controller.drag_over("A2", Some("chosen"));
        controller.drag_end("A2", Some("chosen"));

        let messages = announcements.borrow().messages().to_vec();
        assert_eq!(
            messages,
            vec![
                "Picked up draggable item A2.".to_string(),
                "Draggable item A2 was moved over droppable area chosen.".to_string(),
                "Draggable item A2 was dropped over droppable area chosen".to_string(),
            ]
        );
    }

    #[test]
    fn test_compute_drop_cross_collection_is_none() {
        let state = StoreState::from_collections([
            Collection::new("options", ["A1"]),
            Collection::new("chosen", ["B1"]),
        ])
        .unwrap();
        assert!(compute_drop(&state, "A1", Some("B1")).is_none());
        assert!(compute_drop(&state, "A1", Some("chosen")).is_none());
        assert!(compute_drop(&state, "A1", None).is_none());
    }

    const TOKENS: [Option<&str>; 8] = [
        Some("A1"),
        Some("A2"),
        Some("A3"),
        Some("B1"),
        Some("options"),
        Some("chosen"),
        Some("ghost"),
        None,
    ];

    fn mixed() -> DragController {
        let store = CollectionStore::from_collections([
            Collection::new("options", ["A1", "A2", "A3"]),
            Collection::new("chosen", ["B1"]),
        ])
        .unwrap();
        DragController::new(store)
    }

    fn sorted_items(state: &StoreState) -> Vec<ItemId> {
        let mut all: Vec<ItemId> = state.all_items().cloned().collect();
        all.sort();
        all
    }

    #[test]
    fn test_every_short_drag_conserves_items() {
        let initial = mixed().current_state().clone();
        let expected = sorted_items(&initial);

        for dragged in ["A1", "A2", "A3", "B1"] {
            for first in TOKENS {
                for second in TOKENS {
                    for drop in TOKENS {
                        let mut controller = mixed();
                        controller.drag_start(dragged);
                        controller.drag_over(dragged, first);
                        controller.drag_over(dragged, second);
                        assert_eq!(sorted_items(controller.current_state()), expected);

                        controller.drag_end(dragged, drop);
                        let state = controller.current_state();
                        assert!(state.validate().is_ok());
                        assert_eq!(sorted_items(state), expected);
                        assert!(!controller.phase().is_dragging());
                    }

                    let mut controller = mixed();
                    controller.drag_start(dragged);
                    controller.drag_over(dragged, first);
                    controller.drag_over(dragged, second);
                    controller.drag_cancel(dragged);
                    assert_eq!(controller.current_state(), &initial);
                }
            }
        }
    }
}

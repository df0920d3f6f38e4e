//! Reorder engine: live preview placement of a dragged item.
//!
//! Hovering a different collection moves the dragged item there right away.
//! Hovering inside its own collection is left alone until the drop, so the
//! source list does not thrash while the pointer is still over it.

use crate::collection::{CollectionName, ItemId};
use crate::lookup::{self, OverTarget};
use crate::store::StoreState;

/// A cross-collection move decided by the reorder engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewMove {
    /// The dragged item.
    pub id: ItemId,
    /// Collection the item leaves.
    pub from: CollectionName,
    /// Collection the item enters.
    pub to: CollectionName,
    /// Insertion index within `to`, before the item is inserted.
    pub index: usize,
}

/// Decide where a hover over `over` places `dragged`, if anywhere.
///
/// Returns `None` when either side does not resolve or both resolve to the
/// same collection.
pub fn plan_preview(state: &StoreState, dragged: &str, over: Option<&str>) -> Option<PreviewMove> {
    let from = lookup::resolve(state, dragged)?;
    let target = OverTarget::resolve(state, over);
    let to = target.collection()?.clone();
    if from == to {
        return None;
    }

    let destination = state.get(to.as_str()).ok()?;
    let index = match &target {
        OverTarget::Item { id, .. } => destination
            .index_of(id.as_str())
            .unwrap_or(destination.len()),
        // Container drop zone: append.
        _ => destination.len(),
    };

    Some(PreviewMove {
        id: ItemId::new(dragged),
        from,
        to,
        index,
    })
}

/// Apply a planned move to a copy of `state`.
///
/// Only the two collections named by the move are touched.
pub fn apply_preview(state: &StoreState, planned: &PreviewMove) -> StoreState {
    let mut next = state.clone();
    if let Ok(source) = next.get_mut(planned.from.as_str()) {
        source.items.retain(|item| item != &planned.id);
    }
    if let Ok(destination) = next.get_mut(planned.to.as_str()) {
        let index = planned.index.min(destination.len());
        destination.items.insert(index, planned.id.clone());
    }
    next
}

/// Compute the preview arrangement for hovering `dragged` over `over`.
///
/// Pure and idempotent: identical arguments yield identical results, and an
/// unresolvable or same-collection hover returns the state unchanged.
pub fn compute_preview(state: &StoreState, dragged: &str, over: Option<&str>) -> StoreState {
    match plan_preview(state, dragged, over) {
        Some(planned) => apply_preview(state, &planned),
        None => state.clone(),
    }
}

/// Move the element at `from` to position `to`, shifting the rest.
///
/// Out of range indices leave the slice untouched.
pub fn array_move<T>(items: &mut [T], from: usize, to: usize) {
    if from >= items.len() || to >= items.len() {
        return;
    }
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
}

//! Container lookup: which collection a token refers to.

use crate::collection::{CollectionName, ItemId};
use crate::store::StoreState;

/// What a drag is hovering or dropped on, resolved against a store state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverTarget {
    /// A specific item, and the collection currently holding it.
    Item {
        id: ItemId,
        collection: CollectionName,
    },
    /// A collection's own drop zone (e.g. an empty list).
    Container(CollectionName),
    /// Nothing, or a token that names neither a collection nor an item.
    None,
}

impl OverTarget {
    /// Resolve an optional raw token from the input layer.
    pub fn resolve(state: &StoreState, token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Self::None;
        };
        if let Some(name) = state.names().find(|n| n.as_str() == token) {
            return Self::Container(name.clone());
        }
        match state.collections().find(|c| c.contains(token)) {
            Some(collection) => Self::Item {
                id: ItemId::new(token),
                collection: collection.name.clone(),
            },
            None => Self::None,
        }
    }

    /// The collection this target lands in, if any.
    pub fn collection(&self) -> Option<&CollectionName> {
        match self {
            Self::Item { collection, .. } => Some(collection),
            Self::Container(name) => Some(name),
            Self::None => None,
        }
    }

    /// Check if the target resolved to nothing.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Resolve a token to the name of the collection it refers to.
///
/// A registered collection name resolves to itself; otherwise the collection
/// containing the token as an item. Returns `None` when neither matches,
/// which callers treat as a no-op.
pub fn resolve(state: &StoreState, token: &str) -> Option<CollectionName> {
    OverTarget::resolve(state, Some(token)).collection().cloned()
}

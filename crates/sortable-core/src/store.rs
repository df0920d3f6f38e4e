//! Collection store: the named ordered collections a drag rearranges.

use crate::collection::{Collection, CollectionName, ItemId};
use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A full value copy of every collection, in registration order.
///
/// This is what previews, snapshots and commits exchange. It is only
/// constructed through [`StoreState::from_collections`] (deserialization
/// included) or derived from an already valid state, so the uniqueness
/// invariant always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Collection>", into = "Vec<Collection>")]
pub struct StoreState {
    collections: Vec<Collection>,
}

impl TryFrom<Vec<Collection>> for StoreState {
    type Error = StoreError;

    fn try_from(collections: Vec<Collection>) -> StoreResult<Self> {
        Self::from_collections(collections)
    }
}

impl From<StoreState> for Vec<Collection> {
    fn from(state: StoreState) -> Self {
        state.collections
    }
}

impl StoreState {
    /// Build a state from collections, rejecting duplicate items or names.
    pub fn from_collections(collections: impl IntoIterator<Item = Collection>) -> StoreResult<Self> {
        let state = Self {
            collections: collections.into_iter().collect(),
        };
        state.validate()?;
        Ok(state)
    }

    /// Check the uniqueness invariant.
    ///
    /// Every item appears exactly once across all collections, names are
    /// distinct, and no name equals an item id.
    pub fn validate(&self) -> StoreResult<()> {
        let mut names: HashSet<&str> = HashSet::new();
        for collection in &self.collections {
            if !names.insert(collection.name.as_str()) {
                return Err(StoreError::NameCollision(collection.name.to_string()));
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for item in self.collections.iter().flat_map(|c| c.items.iter()) {
            if names.contains(item.as_str()) {
                return Err(StoreError::NameCollision(item.to_string()));
            }
            if !seen.insert(item.as_str()) {
                return Err(StoreError::DuplicateItem(item.to_string()));
            }
        }
        Ok(())
    }

    /// Get a collection by name.
    pub fn get(&self, name: &str) -> StoreResult<&Collection> {
        self.collections
            .iter()
            .find(|c| c.name.as_str() == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> StoreResult<&mut Collection> {
        self.collections
            .iter_mut()
            .find(|c| c.name.as_str() == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Check if a collection with this name is registered.
    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.iter().any(|c| c.name.as_str() == name)
    }

    /// Collections in registration order.
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter()
    }

    /// Collection names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &CollectionName> {
        self.collections.iter().map(|c| &c.name)
    }

    /// Every item id across all collections, in collection then item order.
    pub fn all_items(&self) -> impl Iterator<Item = &ItemId> {
        self.collections.iter().flat_map(|c| c.items.iter())
    }

    /// Total number of items across all collections.
    pub fn item_count(&self) -> usize {
        self.collections.iter().map(Collection::len).sum()
    }
}

/// Owns the current arrangement and swaps it atomically.
///
/// `replace_all` is the single mutation point: observers reading
/// [`CollectionStore::current_state`] only ever see a fully substituted state.
#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    state: StoreState,
    /// Bumped on every successful replacement.
    revision: u64,
}

impl CollectionStore {
    /// Create a store from an initial state, validating uniqueness.
    pub fn new(state: StoreState) -> StoreResult<Self> {
        state.validate()?;
        Ok(Self { state, revision: 0 })
    }

    /// Create a store from collections, validating uniqueness.
    pub fn from_collections(collections: impl IntoIterator<Item = Collection>) -> StoreResult<Self> {
        StoreState::from_collections(collections).and_then(Self::new)
    }

    /// Get a collection by name.
    pub fn get(&self, name: &str) -> StoreResult<&Collection> {
        self.state.get(name)
    }

    /// Atomically swap the entire store.
    ///
    /// An invalid state is rejected whole and the current state is kept.
    pub fn replace_all(&mut self, new_state: StoreState) -> StoreResult<()> {
        new_state.validate()?;
        self.state = new_state;
        self.revision += 1;
        Ok(())
    }

    /// Deep copy of the current state.
    pub fn snapshot(&self) -> StoreState {
        self.state.clone()
    }

    /// Read-only view of the current state for rendering.
    pub fn current_state(&self) -> &StoreState {
        &self.state
    }

    /// Number of successful replacements so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Insert a new item into a collection at `index`, or append if `None`.
    ///
    /// The index is clamped to the collection length.
    pub fn insert_item(
        &mut self,
        collection: &str,
        id: impl Into<ItemId>,
        index: Option<usize>,
    ) -> StoreResult<()> {
        let mut next = self.snapshot();
        let target = next.get_mut(collection)?;
        let index = index.map_or(target.len(), |i| i.min(target.len()));
        target.items.insert(index, id.into());
        self.replace_all(next)
    }

    /// Remove an item from whichever collection holds it.
    ///
    /// Returns the collection it was removed from.
    pub fn remove_item(&mut self, id: &str) -> StoreResult<CollectionName> {
        let mut next = self.snapshot();
        let holder = next
            .collections
            .iter_mut()
            .find(|c| c.contains(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        holder.items.retain(|item| item.as_str() != id);
        let name = holder.name.clone();
        self.replace_all(next)?;
        Ok(name)
    }

    /// Register a new empty collection at the end of the registration order.
    pub fn add_collection(&mut self, name: impl Into<CollectionName>) -> StoreResult<()> {
        let mut next = self.snapshot();
        next.collections.push(Collection::empty(name));
        self.replace_all(next)
    }
}

//! Item identifiers, collection names and ordered collections.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque identifier of a draggable item.
///
/// Unique across every collection of a store at any instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new item identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Name of a collection (a drop zone).
///
/// Drawn from the same token space as [`ItemId`] but never equal to one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionName(String);

impl CollectionName {
    /// Create a new collection name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CollectionName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CollectionName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for CollectionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A named ordered sequence of item identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection name.
    pub name: CollectionName,
    /// Items in display order.
    pub items: Vec<ItemId>,
}

impl Collection {
    /// Create a collection from a name and items.
    pub fn new<I, T>(name: impl Into<CollectionName>, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        Self {
            name: name.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an empty collection.
    pub fn empty(name: impl Into<CollectionName>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the collection has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if the collection contains an item.
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.as_str() == id)
    }

    /// Position of an item, if present.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.as_str() == id)
    }
}

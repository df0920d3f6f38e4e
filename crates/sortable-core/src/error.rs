//! Error types for the store and the drag controller.

use thiserror::Error;

/// Collection store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Collection not found: {0}")]
    NotFound(String),
    #[error("Item appears more than once: {0}")]
    DuplicateItem(String),
    #[error("Collection name collides with another name or an item: {0}")]
    NameCollision(String),
    #[error("Store is owned by an open drag session")]
    SessionOpen,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Drag event errors.
///
/// These never reach the host as failures; the controller recovers them
/// locally and reports them as ignored events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid session: {0}")]
    InvalidSession(String),
}

/// Result type for drag steps.
pub type DragResult<T> = Result<T, DragError>;

impl From<StoreError> for DragError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => DragError::NotFound(name),
            other => DragError::InvalidSession(other.to_string()),
        }
    }
}

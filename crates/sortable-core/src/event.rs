//! Drag events consumed from the input layer and their outcomes.

use crate::error::DragError;
use serde::{Deserialize, Serialize};

/// A drag event produced by the input layer.
///
/// `over` is the already hit-tested target token: an item id, a collection
/// name, or `None` when the pointer is over nothing droppable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DragEvent {
    Start {
        id: String,
    },
    Over {
        id: String,
        #[serde(default)]
        over: Option<String>,
    },
    End {
        id: String,
        #[serde(default)]
        over: Option<String>,
    },
    Cancel {
        id: String,
    },
}

impl DragEvent {
    pub fn start(id: impl Into<String>) -> Self {
        Self::Start { id: id.into() }
    }

    pub fn over(id: impl Into<String>, over: Option<&str>) -> Self {
        Self::Over {
            id: id.into(),
            over: over.map(str::to_string),
        }
    }

    pub fn end(id: impl Into<String>, over: Option<&str>) -> Self {
        Self::End {
            id: id.into(),
            over: over.map(str::to_string),
        }
    }

    pub fn cancel(id: impl Into<String>) -> Self {
        Self::Cancel { id: id.into() }
    }

    /// The dragged item this event refers to.
    pub fn id(&self) -> &str {
        match self {
            Self::Start { id }
            | Self::Over { id, .. }
            | Self::End { id, .. }
            | Self::Cancel { id } => id,
        }
    }
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// A session was opened. `changed` is set when a restart first
    /// restored the previous session's snapshot.
    Started { changed: bool },
    /// The store now shows a new preview arrangement.
    Previewed,
    /// The event was valid but left the store as it was.
    Unchanged,
    /// The session closed and its arrangement was kept.
    Committed { changed: bool },
    /// The session closed and the pre-drag arrangement was restored.
    Cancelled { changed: bool },
    /// The event was stray or malformed and was dropped.
    Ignored(DragError),
}

impl DragOutcome {
    /// Check if the store was replaced with a different arrangement.
    pub fn changed(&self) -> bool {
        match self {
            Self::Previewed => true,
            Self::Started { changed }
            | Self::Committed { changed }
            | Self::Cancelled { changed } => *changed,
            Self::Unchanged | Self::Ignored(_) => false,
        }
    }

    /// Check if the event was ignored.
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

//! Sortable Core Library
//!
//! Drag-initiated reordering of items across named ordered collections.
//! The input layer feeds resolved drag events in; the host reads the
//! resulting arrangement back out after every event to re-render.

pub mod announce;
pub mod collection;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod lookup;
pub mod reorder;
pub mod session;
pub mod store;

pub use announce::{Announcements, DragNotice, DragObserver, LogObserver};
pub use collection::{Collection, CollectionName, ItemId};
pub use config::{ControllerConfig, RestartPolicy};
pub use controller::{DragController, compute_drop};
pub use error::{DragError, DragResult, StoreError, StoreResult};
pub use event::{DragEvent, DragOutcome};
pub use lookup::OverTarget;
pub use reorder::{PreviewMove, array_move, compute_preview};
pub use session::{DragPhase, DragSession};
pub use store::{CollectionStore, StoreState};

//! Sortable Application
//!
//! Host shell around the reorder engine: builds the collection store from a
//! config, injects it into the drag controller and replays drag events.

mod app;

pub use app::{App, AppConfig, AppError, AppResult, CollectionConfig, Frame};

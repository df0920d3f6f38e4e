//! Application state and event replay loop.

use serde::{Deserialize, Serialize};
use sortable_core::{
    Announcements, Collection, CollectionStore, ControllerConfig, DragController, DragEvent,
    ItemId, LogObserver, StoreError, StoreState,
};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid collections: {0}")]
    Store(#[from] StoreError),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// One collection as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Initial collections, in drop zone order.
    pub collections: Vec<CollectionConfig>,
    #[serde(default)]
    pub controller: ControllerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collections: vec![
                CollectionConfig {
                    name: "list1".to_string(),
                    items: (1..=7).map(|i| format!("A{i}")).collect(),
                },
                CollectionConfig {
                    name: "list2".to_string(),
                    items: Vec::new(),
                },
            ],
            controller: ControllerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Two-list form layout: every item starts in `options`, `chosen` is empty.
    pub fn options_and_chosen<I, S>(all_items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            collections: vec![
                CollectionConfig {
                    name: "options".to_string(),
                    items: all_items.into_iter().map(Into::into).collect(),
                },
                CollectionConfig {
                    name: "chosen".to_string(),
                    items: Vec::new(),
                },
            ],
            controller: ControllerConfig::default(),
        }
    }

    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&json)?;
        log::info!("Loaded config from: {:?}", path.as_ref());
        Ok(config)
    }

    /// Build the initial store, validating item uniqueness.
    pub fn build_store(&self) -> AppResult<CollectionStore> {
        let collections = self
            .collections
            .iter()
            .map(|c| Collection::new(c.name.as_str(), c.items.iter().map(String::as_str)));
        Ok(CollectionStore::from_collections(collections)?)
    }
}

/// What the host renders after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Whether the arrangement changed with this event.
    pub changed: bool,
    /// Item shown in the drag overlay.
    pub active: Option<ItemId>,
    /// Screen reader text for this event, if it was accepted.
    pub announcement: Option<String>,
    /// Full arrangement after the event.
    pub state: StoreState,
}

/// Main application struct.
pub struct App {
    controller: DragController,
    announcements: Rc<RefCell<Announcements>>,
}

impl App {
    /// Create the application from a config.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let store = config.build_store()?;
        let mut controller = DragController::with_config(store, config.controller);
        let announcements = Rc::new(RefCell::new(Announcements::new()));
        controller.add_observer(LogObserver);
        controller.add_observer(announcements.clone());
        Ok(Self {
            controller,
            announcements,
        })
    }

    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    /// Apply one event and describe the result for rendering.
    pub fn apply(&mut self, event: &DragEvent) -> Frame {
        let outcome = self.controller.handle(event);
        let announcement = self.announcements.borrow_mut().drain().pop();
        Frame {
            changed: outcome.changed(),
            active: self.controller.active_id().cloned(),
            announcement,
            state: self.controller.current_state().clone(),
        }
    }

    /// Replay JSON-lines drag events from `input`, writing one frame per line.
    ///
    /// Blank lines are skipped. A malformed line is logged and skipped so a
    /// bad event cannot end the session.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> AppResult<()> {
        writeln!(output, "{}", serde_json::to_string(self.controller.current_state())?)?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let event: DragEvent = match serde_json::from_str(line) {
                Ok(event) => event,
                Err(e) => {
                    log::warn!("Failed to parse drag event: {}: {}", line, e);
                    continue;
                }
            };
            let frame = self.apply(&event);
            writeln!(output, "{}", serde_json::to_string(&frame)?)?;
        }
        output.flush()?;
        Ok(())
    }
}

//! Observability hooks mirroring each handled drag event.
//!
//! Observers are side-effect only. They receive a [`DragNotice`] after the
//! controller has finished with an event and cannot influence store state.

use crate::collection::{CollectionName, ItemId};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// A handled drag event, as seen by observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragNotice {
    PickedUp {
        session_id: Uuid,
        id: ItemId,
        collection: CollectionName,
        index: usize,
    },
    MovedOver {
        session_id: Uuid,
        id: ItemId,
        over: Option<String>,
    },
    Dropped {
        session_id: Uuid,
        id: ItemId,
        over: Option<String>,
    },
    Cancelled {
        session_id: Uuid,
        id: ItemId,
    },
}

impl DragNotice {
    /// Session the notice belongs to.
    pub fn session_id(&self) -> Uuid {
        match self {
            Self::PickedUp { session_id, .. }
            | Self::MovedOver { session_id, .. }
            | Self::Dropped { session_id, .. }
            | Self::Cancelled { session_id, .. } => *session_id,
        }
    }

    /// Screen reader text for this notice.
    pub fn announcement(&self) -> String {
        match self {
            Self::PickedUp { id, .. } => format!("Picked up draggable item {id}."),
            Self::MovedOver { id, over: Some(over), .. } => {
                format!("Draggable item {id} was moved over droppable area {over}.")
            }
            Self::MovedOver { id, over: None, .. } => {
                format!("Draggable item {id} is no longer over a droppable area.")
            }
            Self::Dropped { id, over: Some(over), .. } => {
                format!("Draggable item {id} was dropped over droppable area {over}")
            }
            Self::Dropped { id, over: None, .. } => format!("Draggable item {id} was dropped."),
            Self::Cancelled { id, .. } => {
                format!("Dragging was cancelled. Draggable item {id} was dropped.")
            }
        }
    }
}

/// Receives a notice for every event the controller accepted.
pub trait DragObserver {
    fn notify(&mut self, notice: &DragNotice);
}

/// Lets the host keep a handle on an observer it registered.
impl<T: DragObserver> DragObserver for Rc<RefCell<T>> {
    fn notify(&mut self, notice: &DragNotice) {
        self.borrow_mut().notify(notice);
    }
}

/// Forwards notices to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl DragObserver for LogObserver {
    fn notify(&mut self, notice: &DragNotice) {
        match notice {
            DragNotice::MovedOver { .. } => {
                log::debug!("[drag {}] {}", notice.session_id(), notice.announcement());
            }
            _ => log::info!("[drag {}] {}", notice.session_id(), notice.announcement()),
        }
    }
}

/// Collects announcement text for an accessibility live region.
#[derive(Debug, Default, Clone)]
pub struct Announcements {
    messages: Vec<String>,
}

impl Announcements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announcements collected so far, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Most recent announcement.
    pub fn latest(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    /// Take and clear the collected announcements.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

impl DragObserver for Announcements {
    fn notify(&mut self, notice: &DragNotice) {
        self.messages.push(notice.announcement());
    }
}

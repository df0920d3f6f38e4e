//! Controller configuration.

use serde::{Deserialize, Serialize};

/// What to do with a drag start that arrives while a drag is already open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Drop the new start; the open session continues.
    #[default]
    Ignore,
    /// Cancel the open session (restoring its snapshot), then start anew.
    CancelAndRestart,
}

/// Drag controller settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub restart_policy: RestartPolicy,
}

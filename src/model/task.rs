//! Asynchronous task resources
//!
//! Submitting a long-running operation returns a handle pointing at a
//! status URI; polling that URI yields a [`TaskStatus`] until the task
//! reaches a terminal state.

use serde::{Deserialize, Serialize};

/// Response carrying just a resource URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriResponse {
    /// URI of the created or affected resource
    pub uri: String,
}

/// Accepted asynchronous task pointing at its status resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncTask {
    /// URI to poll for task status
    pub poll_uri: String,
}

/// State reported by a task status resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    /// Task completed successfully
    Ok,
    /// Task completed with errors
    Error,
    /// Task was canceled server-side
    Canceled,
    /// Task is executing
    Running,
    /// Task is queued, not yet started
    Prepared,
    /// Any state this SDK version does not know; treated as in progress
    #[serde(other)]
    Other,
}

impl TaskState {
    /// True once the task will not change state again
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ok | Self::Error | Self::Canceled)
    }

    /// True for terminal success
    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Status document returned by polling a task status URI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    /// Current task state
    pub status: TaskState,
    /// Server-reported messages, populated on failure
    #[serde(default)]
    pub messages: Vec<String>,
    /// Status URI of this task, when the server echoes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_uri: Option<String>,
}

impl TaskStatus {
    /// True once the task will not change state again
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// True for terminal success
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

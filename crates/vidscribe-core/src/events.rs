//! Worker event types.
//!
//! Every background operation (file download, archive extraction, model
//! fetch, video download) reports through the same shape: zero or more
//! `Progress` events followed by exactly one `Finished` carrying the
//! terminal outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single progress update: percentage plus a human-readable line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Progress percentage (0 - 100).
    pub percent: u8,
    pub message: String,
}

impl ProgressEvent {
    /// Create a progress event, clamping `percent` to 100.
    pub fn new(percent: u8, message: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            message: message.into(),
        }
    }

    /// Compute the percentage for `done` out of `total` bytes.
    ///
    /// Unknown totals (`0`) report 0%.
    #[must_use]
    pub fn percent_of(done: u64, total: u64) -> u8 {
        if total == 0 {
            return 0;
        }
        let pct = u128::from(done) * 100 / u128::from(total);
        u8::try_from(pct.min(100)).unwrap_or(100)
    }
}

/// How a worker operation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TerminalOutcome<T> {
    Succeeded(T),
    Failed(String),
    Cancelled,
}

impl<T> TerminalOutcome<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// The state a worker ends in when it produces this outcome.
    #[must_use]
    pub const fn state(&self) -> WorkerState {
        match self {
            Self::Succeeded(_) => WorkerState::Succeeded,
            Self::Failed(_) => WorkerState::Failed,
            Self::Cancelled => WorkerState::Cancelled,
        }
    }
}

/// Events streamed from a worker to whoever drives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent<T> {
    Progress(ProgressEvent),
    Finished(TerminalOutcome<T>),
}

/// Lifecycle of a worker. Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl WorkerState {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

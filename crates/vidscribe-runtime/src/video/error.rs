//! Error types for video downloads.

use thiserror::Error;
use vidscribe_download::DownloadError;

/// Errors from [`VideoDownloadOrchestrator`](super::VideoDownloadOrchestrator).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VideoError {
    /// A download is already running on this orchestrator.
    #[error("A video download is already in progress")]
    Busy,

    /// Metadata extraction failed (bad URL, unsupported site, timeout).
    #[error("Failed to read video metadata: {0}")]
    Metadata(String),

    /// The extractor process failed while downloading.
    #[error("Video download failed: {0}")]
    Process(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    /// Subtitle repair download failed.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Video download cancelled")]
    Cancelled,
}

impl VideoError {
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        Self::Filesystem(err.to_string())
    }
}

impl From<DownloadError> for VideoError {
    fn from(err: DownloadError) -> Self {
        if err.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Network(err.to_string())
        }
    }
}

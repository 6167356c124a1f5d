//! Worker error types.
//!
//! I/O and HTTP failures are captured as kind + message strings so the
//! errors stay `Clone` and can be forwarded as plain text in a
//! `TerminalOutcome::Failed`.

use thiserror::Error;

/// Error type for HTTP transfers and mirror listings.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DownloadError {
    /// I/O error while writing the destination file.
    #[error("I/O error ({kind}): {message}")]
    Io { kind: String, message: String },

    /// Network/HTTP error.
    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
    },

    /// The remote resource does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Connection or read stalled longer than the configured limit.
    #[error("Timed out after {seconds}s without data")]
    Timeout { seconds: u64 },

    /// The mirror returned a listing we cannot use.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Transfer was cancelled by the user.
    #[error("Download cancelled")]
    Cancelled,
}

impl DownloadError {
    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a network error with HTTP status code.
    ///
    /// 404 maps to [`DownloadError::NotFound`].
    pub fn network_with_status(message: impl Into<String>, status_code: u16) -> Self {
        if status_code == 404 {
            return Self::NotFound {
                message: message.into(),
            };
        }
        Self::Network {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Classify a reqwest error.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            return Self::Timeout {
                seconds: timeout_secs,
            };
        }
        match err.status() {
            Some(status) => Self::network_with_status(err.to_string(), status.as_u16()),
            None => Self::network(err.to_string()),
        }
    }

    /// Whether this error represents a user cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(&err)
    }
}

/// Error type for archive extraction.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// No extractor handles this file extension.
    #[error("Unsupported archive format: {file_name}")]
    UnsupportedFormat { file_name: String },

    /// The external extraction tool is not installed.
    #[error("{tool} not found on PATH. Install 7-Zip and try again.")]
    ToolMissing { tool: String },

    /// The extraction tool could not be started.
    #[error("Failed to start {tool}: {message}")]
    Spawn { tool: String, message: String },

    /// The extraction tool exited unsuccessfully.
    #[error("Extraction failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    /// The archive itself is malformed.
    #[error("Corrupt archive: {message}")]
    Corrupt { message: String },

    #[error("I/O error ({kind}): {message}")]
    Io { kind: String, message: String },

    #[error("Extraction timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Extraction cancelled")]
    Cancelled,
}

impl ExtractError {
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(&err)
    }
}

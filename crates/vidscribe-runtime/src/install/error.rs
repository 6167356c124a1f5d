//! Error types for program and model installation.

use thiserror::Error;
use vidscribe_core::PathError;

/// Errors from the installation orchestrator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstallError {
    /// Another install holds the gate; nothing was touched.
    #[error("Another download is in progress. Wait for it to finish.")]
    AlreadyInProgress,

    /// Paths or catalog data are unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Failed to extract archive: {0}")]
    Extraction(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    /// User confirmation was required but not available (non-interactive mode)
    #[error("User confirmation required: {message}")]
    PromptRequired { message: String },

    #[error("Installation cancelled")]
    Cancelled,
}

impl InstallError {
    /// Create a `PromptRequired` error with a message
    pub fn prompt_required(message: impl Into<String>) -> Self {
        Self::PromptRequired {
            message: message.into(),
        }
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<PathError> for InstallError {
    fn from(err: PathError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<std::io::Error> for InstallError {
    fn from(err: std::io::Error) -> Self {
        Self::Filesystem(err.to_string())
    }
}

pub type InstallResult<T> = Result<T, InstallError>;

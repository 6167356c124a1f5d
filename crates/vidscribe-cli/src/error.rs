//! CLI-specific error types and mappings.
//!
//! Maps layer errors to exit codes and user-facing messages.

use thiserror::Error;
use vidscribe_core::{PathError, ReadinessError, SettingsError};
use vidscribe_runtime::{InstallError, VideoError};

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Download, extraction or network failure.
    #[error("{0}")]
    Download(String),

    /// Another install is running, or confirmation was needed.
    #[error("{0}")]
    Unavailable(String),

    /// External process failure (yt-dlp, 7-Zip).
    #[error("Process error: {0}")]
    Process(String),

    #[error("Cancelled")]
    Cancelled,
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    /// - 130: Interrupted
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Download(_) => 1,
            Self::Arguments(_) => 2,   // EX_USAGE
            Self::Unavailable(_) => 75, // EX_TEMPFAIL
            Self::Process(_) => 71,    // EX_OSERR
            Self::Io(_) => 74,         // EX_IOERR
            Self::Config(_) => 78,     // EX_CONFIG
            Self::Cancelled => 130,
        }
    }
}

impl From<InstallError> for CliError {
    fn from(err: InstallError) -> Self {
        match err {
            InstallError::AlreadyInProgress | InstallError::PromptRequired { .. } => {
                Self::Unavailable(err.to_string())
            }
            InstallError::Configuration(msg) => Self::Config(msg),
            InstallError::Filesystem(msg) => Self::Io(msg),
            InstallError::Download(_) | InstallError::Extraction(_) => Self::Download(err.to_string()),
            InstallError::Cancelled => Self::Cancelled,
        }
    }
}

impl From<VideoError> for CliError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::Busy => Self::Unavailable(err.to_string()),
            VideoError::Metadata(_) | VideoError::Network(_) => Self::Download(err.to_string()),
            VideoError::Process(msg) => Self::Process(msg),
            VideoError::Filesystem(msg) => Self::Io(msg),
            VideoError::Cancelled => Self::Cancelled,
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ReadinessError> for CliError {
    fn from(err: ReadinessError) -> Self {
        Self::Arguments(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

//! Errors from resolving and preparing vidscribe directories.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// `dirs::data_local_dir()` returned nothing and no override was set.
    #[error("Cannot determine local data directory")]
    NoDataDir,

    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Missing directory under [`DirectoryCreationStrategy::Disallow`](super::DirectoryCreationStrategy::Disallow).
    #[error("Directory {0} does not exist")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// The write probe in [`verify_writable`](super::verify_writable) failed.
    #[error("Directory {path} is not writable: {reason}")]
    NotWritable { path: PathBuf, reason: String },

    #[error("Path cannot be empty")]
    EmptyPath,

    /// Relative path given while the working directory is unreadable.
    #[error("Cannot resolve relative path: {0}")]
    CurrentDirError(String),
}

//! Path utilities for vidscribe data directories and user-configurable locations.
//!
//! This module provides the canonical path resolution for all vidscribe components:
//! - Application data root (settings, cookies)
//! - Transcriber binaries directory
//! - Models directory
//! - Default video work directory
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately

mod ensure;
mod error;
mod layout;
mod models;
mod platform;
mod resolver;

#[cfg(test)]
pub(crate) mod test_utils;

// Error type
pub use error::PathError;

// Platform roots
pub use platform::{data_root, default_work_dir, normalize_user_path};

// Fixed locations under the data root
pub use layout::{bin_dir, cookie_file_path, settings_file_path};

// Models directory
pub use models::{ModelsDirResolution, ModelsDirSource, default_models_dir, resolve_models_dir};

// Directory operations
pub use ensure::{DirectoryCreationStrategy, ensure_directory, verify_writable};

// Pure resolver for the CLI `paths` command
pub use resolver::ResolvedPaths;

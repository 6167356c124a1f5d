//! Fixed file locations under the data root.

use std::env;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::{data_root, normalize_user_path};

/// Directory holding the transcriber binaries.
///
/// `VIDSCRIBE_BIN_DIR` overrides the default `<data_root>/bin`.
pub fn bin_dir() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var("VIDSCRIBE_BIN_DIR") {
        if !path.trim().is_empty() {
            return normalize_user_path(&path);
        }
    }
    Ok(data_root()?.join("bin"))
}

/// Location of the settings file.
pub fn settings_file_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("settings.json"))
}

/// Location of the Netscape-format cookie file handed to the video extractor.
pub fn cookie_file_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("cookies.txt"))
}

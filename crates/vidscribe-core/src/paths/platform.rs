//! Platform-appropriate roots.

use std::env;
use std::fs;
use std::path::PathBuf;

use super::error::PathError;

/// Application name used for per-user directories.
const APP_DIR_NAME: &str = "vidscribe";

/// Get the root directory for application data (settings, cookies, binaries).
///
/// Resolution order:
/// 1. `VIDSCRIBE_DATA_DIR` environment variable (highest priority)
/// 2. System data directory (e.g., `~/.local/share/vidscribe`)
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var("VIDSCRIBE_DATA_DIR") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    let root = data_dir.join(APP_DIR_NAME);

    if !root.exists() {
        fs::create_dir_all(&root).map_err(|e| PathError::CreateFailed {
            path: root.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(root)
}

/// Default directory videos are downloaded into (`~/Videos/vidscribe`).
pub fn default_work_dir() -> Result<PathBuf, PathError> {
    let videos = dirs::video_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Videos")))
        .ok_or(PathError::NoHomeDir)?;
    Ok(videos.join(APP_DIR_NAME))
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn test_data_root_honours_env_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::set("VIDSCRIBE_DATA_DIR", "/tmp/vidscribe-data");
        assert_eq!(data_root().unwrap(), PathBuf::from("/tmp/vidscribe-data"));
    }

    #[test]
    fn test_normalize_rejects_blank() {
        assert!(matches!(normalize_user_path("  "), Err(PathError::EmptyPath)));
    }

    #[test]
    fn test_normalize_makes_relative_absolute() {
        let path = normalize_user_path("some/dir").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("some/dir"));
    }
}

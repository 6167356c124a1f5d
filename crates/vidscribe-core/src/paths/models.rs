//! Where CTranslate2 model folders live.

use std::env;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::{data_root, normalize_user_path};

/// How the models directory was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelsDirSource {
    /// The user passed an explicit path (CLI flag or settings override).
    Explicit,
    /// The path came from `VIDSCRIBE_MODELS_DIR` / `.env`.
    EnvVar,
    /// Fallback default (`<data_root>/models`).
    Default,
}

/// A models directory together with where it came from.
#[derive(Debug, Clone)]
pub struct ModelsDirResolution {
    pub path: PathBuf,
    pub source: ModelsDirSource,
}

/// `<data_root>/models`.
pub fn default_models_dir() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("models"))
}

/// Pick the models directory: `explicit`, then `VIDSCRIBE_MODELS_DIR`,
/// then [`default_models_dir`]. Blank environment values are ignored.
pub fn resolve_models_dir(explicit: Option<&str>) -> Result<ModelsDirResolution, PathError> {
    let from_env = env::var("VIDSCRIBE_MODELS_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let (path, source) = match (explicit, from_env) {
        (Some(raw), _) => (normalize_user_path(raw)?, ModelsDirSource::Explicit),
        (None, Some(raw)) => (normalize_user_path(&raw)?, ModelsDirSource::EnvVar),
        (None, None) => (default_models_dir()?, ModelsDirSource::Default),
    };
    Ok(ModelsDirResolution { path, source })
}

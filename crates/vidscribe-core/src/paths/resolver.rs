//! Pure path resolver for CLI introspection.

use std::path::PathBuf;

use super::{
    ModelsDirSource, PathError, bin_dir, cookie_file_path, data_root, default_work_dir,
    resolve_models_dir, settings_file_path,
};

/// All resolved paths captured in a single struct.
///
/// Backs the `vidscribe paths` command and keeps every adapter on the same
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub data_root: PathBuf,
    pub bin_dir: PathBuf,
    pub settings_file: PathBuf,
    pub cookie_file: PathBuf,
    pub work_dir: PathBuf,
    pub models_dir: PathBuf,
    pub models_source: ModelsDirSource,
}

impl ResolvedPaths {
    /// Resolve all paths using the current environment.
    pub fn resolve() -> Result<Self, PathError> {
        Self::resolve_with_models_dir(None)
    }

    /// Resolve with an explicit models directory override.
    pub fn resolve_with_models_dir(models_dir: Option<&str>) -> Result<Self, PathError> {
        let models_resolution = resolve_models_dir(models_dir)?;

        Ok(Self {
            data_root: data_root()?,
            bin_dir: bin_dir()?,
            settings_file: settings_file_path()?,
            cookie_file: cookie_file_path()?,
            work_dir: default_work_dir()?,
            models_dir: models_resolution.path,
            models_source: models_resolution.source,
        })
    }
}

impl std::fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(f, "bin_dir = {}", self.bin_dir.display())?;
        writeln!(f, "settings_file = {}", self.settings_file.display())?;
        writeln!(f, "cookie_file = {}", self.cookie_file.display())?;
        writeln!(f, "work_dir = {}", self.work_dir.display())?;
        writeln!(f, "models_dir = {}", self.models_dir.display())?;
        write!(f, "models_source = {:?}", self.models_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn resolve_returns_consistent_paths() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _data = EnvVarGuard::set("VIDSCRIBE_DATA_DIR", "/tmp/vs-resolve");

        let first = ResolvedPaths::resolve().expect("first resolve");
        let second = ResolvedPaths::resolve().expect("second resolve");

        assert_eq!(first, second, "path resolution should be deterministic");
    }

    #[test]
    fn display_format_is_parseable() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _data = EnvVarGuard::set("VIDSCRIBE_DATA_DIR", "/tmp/vs-resolve");

        let output = ResolvedPaths::resolve().expect("resolve").to_string();
        for key in [
            "data_root = ",
            "bin_dir = ",
            "settings_file = ",
            "cookie_file = ",
            "work_dir = ",
            "models_dir = ",
            "models_source = ",
        ] {
            assert!(output.contains(key), "missing {key}");
        }
    }
}

//! Installed-asset probes.
//!
//! Cheap, side-effect free `stat` checks reporting which transcriber builds
//! and models are present on disk.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{MODELS, ModelId, ProgramKind};

/// CPU-only binary, directly inside the bin directory.
pub const CPU_BINARY_NAME: &str = "faster-whisper.exe";

/// Directory the GPU bundle extracts to, inside the bin directory.
pub const GPU_BUNDLE_DIR: &str = "Faster-Whisper-XXL";

/// Executable inside the GPU bundle directory.
pub const GPU_BINARY_NAME: &str = "faster-whisper-xxl.exe";

/// File whose presence marks a model directory as complete.
pub const MODEL_WEIGHT_FILE: &str = "model.bin";

/// Result of probing the bin directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramProbe {
    pub installed: bool,
    pub kinds: BTreeSet<ProgramKind>,
}

/// Report which transcriber builds are present in `bin_dir`.
///
/// The GPU bundle also runs on CPU, so its presence reports both kinds.
pub fn probe_program(bin_dir: &Path) -> ProgramProbe {
    let mut kinds = BTreeSet::new();

    if bin_dir.join(CPU_BINARY_NAME).is_file() {
        kinds.insert(ProgramKind::Cpu);
    }

    if bin_dir.join(GPU_BUNDLE_DIR).join(GPU_BINARY_NAME).is_file() {
        kinds.insert(ProgramKind::Gpu);
        kinds.insert(ProgramKind::Cpu);
    }

    ProgramProbe {
        installed: !kinds.is_empty(),
        kinds,
    }
}

/// Whether `<models_dir>/<dir_name>/model.bin` exists.
pub fn probe_model(models_dir: &Path, dir_name: &str) -> bool {
    models_dir.join(dir_name).join(MODEL_WEIGHT_FILE).is_file()
}

/// Catalog models whose weight file is present, in catalog order.
pub fn installed_models(models_dir: &Path) -> Vec<ModelId> {
    MODELS
        .iter()
        .filter(|m| probe_model(models_dir, m.dir_name))
        .map(|m| m.id)
        .collect()
}

/// Compute device the transcriber runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    Cuda,
    #[default]
    Cpu,
}

impl Device {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cuda => "cuda",
            Self::Cpu => "cpu",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cuda" | "gpu" => Ok(Self::Cuda),
            "cpu" => Ok(Self::Cpu),
            other => Err(format!("unknown device '{other}' (expected 'cuda' or 'cpu')")),
        }
    }
}

/// Devices usable with the installed builds, GPU first.
pub fn available_devices(probe: &ProgramProbe) -> Vec<Device> {
    let mut devices = Vec::new();
    if probe.kinds.contains(&ProgramKind::Gpu) {
        devices.push(Device::Cuda);
    }
    if probe.kinds.contains(&ProgramKind::Cpu) {
        devices.push(Device::Cpu);
    }
    devices
}

/// Why the transcriber cannot run yet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("Faster-Whisper is not installed. Run 'vidscribe programs install' first.")]
    ProgramMissing,

    #[error("No model selected")]
    NoModelSelected,

    #[error("Model files not found: {0}")]
    ModelMissing(ModelId),
}

/// Check that a transcriber build and the selected model are both on disk.
pub fn check_transcriber_ready(
    bin_dir: &Path,
    models_dir: &Path,
    model: Option<ModelId>,
) -> Result<(), ReadinessError> {
    if !probe_program(bin_dir).installed {
        return Err(ReadinessError::ProgramMissing);
    }
    let model = model.ok_or(ReadinessError::NoModelSelected)?;
    if !probe_model(models_dir, model.model().dir_name) {
        return Err(ReadinessError::ModelMissing(model));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"bin").unwrap();
    }

    #[test]
    fn test_probe_nothing_installed() {
        let temp = tempdir().unwrap();
        let probe = probe_program(temp.path());
        assert!(!probe.installed);
        assert!(probe.kinds.is_empty());
        assert!(available_devices(&probe).is_empty());
    }

    #[test]
    fn test_probe_cpu_only() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join(CPU_BINARY_NAME));
        let probe = probe_program(temp.path());
        assert!(probe.installed);
        assert_eq!(probe.kinds, BTreeSet::from([ProgramKind::Cpu]));
        assert_eq!(available_devices(&probe), vec![Device::Cpu]);
    }

    #[test]
    fn test_probe_gpu_bundle_implies_cpu() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join(GPU_BUNDLE_DIR).join(GPU_BINARY_NAME));
        let probe = probe_program(temp.path());
        assert!(probe.installed);
        assert_eq!(
            probe.kinds,
            BTreeSet::from([ProgramKind::Cpu, ProgramKind::Gpu])
        );
        assert_eq!(available_devices(&probe), vec![Device::Cuda, Device::Cpu]);
    }

    #[test]
    fn test_probe_both_deduplicates() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join(CPU_BINARY_NAME));
        touch(&temp.path().join(GPU_BUNDLE_DIR).join(GPU_BINARY_NAME));
        assert_eq!(probe_program(temp.path()).kinds.len(), 2);
    }

    #[test]
    fn test_probe_model_requires_weight_file() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("faster-whisper-small");
        fs::create_dir_all(&dir).unwrap();
        assert!(!probe_model(temp.path(), "faster-whisper-small"));

        touch(&dir.join(MODEL_WEIGHT_FILE));
        assert!(probe_model(temp.path(), "faster-whisper-small"));
        assert_eq!(installed_models(temp.path()), vec![ModelId::Small]);
    }

    #[test]
    fn test_readiness_checks_in_order() {
        let temp = tempdir().unwrap();
        let bin = temp.path().join("bin");
        let models = temp.path().join("models");

        assert_eq!(
            check_transcriber_ready(&bin, &models, Some(ModelId::Small)),
            Err(ReadinessError::ProgramMissing)
        );

        touch(&bin.join(CPU_BINARY_NAME));
        assert_eq!(
            check_transcriber_ready(&bin, &models, None),
            Err(ReadinessError::NoModelSelected)
        );
        assert_eq!(
            check_transcriber_ready(&bin, &models, Some(ModelId::LargeV3)),
            Err(ReadinessError::ModelMissing(ModelId::LargeV3))
        );

        touch(&models.join("faster-whisper-large-v3").join(MODEL_WEIGHT_FILE));
        assert_eq!(
            check_transcriber_ready(&bin, &models, Some(ModelId::LargeV3)),
            Ok(())
        );
    }
}

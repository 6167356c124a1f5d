//! Static catalogs of installable transcriber programs and models.
//!
//! Entries are addressed by stable identifiers (`ProgramId`, `ModelId`)
//! rather than by their display labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Hardware capability a transcriber build provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramKind {
    Cpu,
    Gpu,
}

impl ProgramKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Gpu => "GPU",
        }
    }
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Shape of a downloaded program artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Runnable as-is once renamed to the canonical binary name.
    Binary,
    /// Must be extracted into the bin directory.
    Archive,
}

/// Stable identifier of a program catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramId {
    Gpu,
    Cpu,
}

impl ProgramId {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gpu => "gpu",
            Self::Cpu => "cpu",
        }
    }

    /// Look up the catalog entry for this identifier.
    #[must_use]
    pub fn program(self) -> &'static InstallableProgram {
        PROGRAMS
            .iter()
            .find(|p| p.id == self)
            .unwrap_or(&PROGRAMS[0])
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProgramId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gpu" | "cuda" => Ok(Self::Gpu),
            "cpu" => Ok(Self::Cpu),
            other => Err(format!("unknown program '{other}' (expected 'cpu' or 'gpu')")),
        }
    }
}

/// A downloadable Faster-Whisper build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallableProgram {
    pub id: ProgramId,
    pub label: &'static str,
    /// File name the artifact is saved under inside the bin directory.
    pub file_name: &'static str,
    pub kind: ProgramKind,
    pub artifact: ArtifactKind,
    pub size: &'static str,
    pub url: &'static str,
}

impl InstallableProgram {
    /// Label shown in selection lists, e.g. `CPU build (78.7 MB)`.
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.label, self.size)
    }
}

pub static PROGRAMS: [InstallableProgram; 2] = [
    InstallableProgram {
        id: ProgramId::Gpu,
        label: "GPU (CUDA) + CPU build",
        file_name: "faster-whisper-gpu.7z",
        kind: ProgramKind::Gpu,
        artifact: ArtifactKind::Archive,
        size: "1.35 GB",
        url: "https://modelscope.cn/models/bkfengg/whisper-cpp/resolve/master/Faster-Whisper-XXL_r245.2_windows.7z",
    },
    InstallableProgram {
        id: ProgramId::Cpu,
        label: "CPU build",
        file_name: "faster-whisper.exe",
        kind: ProgramKind::Cpu,
        artifact: ArtifactKind::Binary,
        size: "78.7 MB",
        url: "https://modelscope.cn/models/bkfengg/whisper-cpp/resolve/master/whisper-faster.exe",
    },
];

/// Stable identifier of a model catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelId {
    Small,
    LargeV1,
    LargeV2,
    LargeV3,
    LargeV3Turbo,
}

impl ModelId {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::LargeV1 => "large-v1",
            Self::LargeV2 => "large-v2",
            Self::LargeV3 => "large-v3",
            Self::LargeV3Turbo => "large-v3-turbo",
        }
    }

    /// Look up the catalog entry for this identifier.
    #[must_use]
    pub fn model(self) -> &'static InstallableModel {
        MODELS.iter().find(|m| m.id == self).unwrap_or(&MODELS[0])
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MODELS
            .iter()
            .find(|m| m.id.as_str() == wanted || m.dir_name == wanted)
            .map(|m| m.id)
            .ok_or_else(|| format!("unknown model '{wanted}'"))
    }
}

/// A downloadable CTranslate2 Whisper model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallableModel {
    pub id: ModelId,
    pub label: &'static str,
    /// Directory name under the models directory.
    pub dir_name: &'static str,
    pub size: &'static str,
    /// Primary source page.
    pub url: &'static str,
    /// Identifier on the mirror repository used for the actual download.
    pub mirror_id: &'static str,
}

pub static MODELS: [InstallableModel; 5] = [
    InstallableModel {
        id: ModelId::Small,
        label: "Small",
        dir_name: "faster-whisper-small",
        size: "484 MB",
        url: "https://huggingface.co/Systran/faster-whisper-small",
        mirror_id: "pengzhendong/faster-whisper-small",
    },
    InstallableModel {
        id: ModelId::LargeV1,
        label: "Large-v1",
        dir_name: "faster-whisper-large-v1",
        size: "3.0 GB",
        url: "https://huggingface.co/Systran/faster-whisper-large-v1",
        mirror_id: "pengzhendong/faster-whisper-large-v1",
    },
    InstallableModel {
        id: ModelId::LargeV2,
        label: "Large-v2",
        dir_name: "faster-whisper-large-v2",
        size: "3.0 GB",
        url: "https://huggingface.co/Systran/faster-whisper-large-v2",
        mirror_id: "pengzhendong/faster-whisper-large-v2",
    },
    InstallableModel {
        id: ModelId::LargeV3,
        label: "Large-v3",
        dir_name: "faster-whisper-large-v3",
        size: "3.0 GB",
        url: "https://huggingface.co/Systran/faster-whisper-large-v3",
        mirror_id: "pengzhendong/faster-whisper-large-v3",
    },
    InstallableModel {
        id: ModelId::LargeV3Turbo,
        label: "Large-v3-turbo",
        dir_name: "faster-whisper-large-v3-turbo",
        size: "1.6 GB",
        url: "https://huggingface.co/Systran/faster-whisper-large-v3-turbo",
        mirror_id: "pengzhendong/faster-whisper-large-v3-turbo",
    },
];

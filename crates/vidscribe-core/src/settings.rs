//! Settings domain types, validation and persistence.
//!
//! All fields are optional so partially written files and older versions
//! load cleanly; `effective_*` accessors supply the defaults.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::ModelId;
use crate::probe::Device;

/// Video resolution cap for downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "4k")]
    P4K,
}

impl Resolution {
    pub const ALL: [Self; 5] = [Self::P360, Self::P480, Self::P720, Self::P1080, Self::P4K];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::P360 => "360p",
            Self::P480 => "480p",
            Self::P720 => "720p",
            Self::P1080 => "1080p",
            Self::P4K => "4k",
        }
    }

    /// Parse a stored label; unknown labels yield `None`.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let wanted = label.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|r| r.as_str() == wanted)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Which subtitle tracks the video extractor should write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubtitleMode {
    /// Uploaded subtitles only.
    OfficialOnly,
    /// Uploaded subtitles, falling back to automatic captions.
    #[default]
    OfficialPreferred,
    /// Automatic captions only.
    Auto,
    /// No subtitles.
    None,
}

impl SubtitleMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OfficialOnly => "official-only",
            Self::OfficialPreferred => "official-preferred",
            Self::Auto => "auto",
            Self::None => "none",
        }
    }
}

impl fmt::Display for SubtitleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SubtitleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "official-only" | "official" => Ok(Self::OfficialOnly),
            "official-preferred" | "preferred" => Ok(Self::OfficialPreferred),
            "auto" => Ok(Self::Auto),
            "none" | "off" => Ok(Self::None),
            other => Err(format!("unknown subtitle mode '{other}'")),
        }
    }
}

/// Voice activity detector used to drop silent segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VadMethod {
    SileroV3,
    #[default]
    SileroV4,
    SileroV5,
    SileroV4Fw,
    PyannoteV3,
    PyannoteOnnxV3,
    Auditok,
    Webrtc,
}

impl VadMethod {
    pub const ALL: [Self; 8] = [
        Self::SileroV3,
        Self::SileroV4,
        Self::SileroV5,
        Self::SileroV4Fw,
        Self::PyannoteV3,
        Self::PyannoteOnnxV3,
        Self::Auditok,
        Self::Webrtc,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SileroV3 => "silero_v3",
            Self::SileroV4 => "silero_v4",
            Self::SileroV5 => "silero_v5",
            Self::SileroV4Fw => "silero_v4_fw",
            Self::PyannoteV3 => "pyannote_v3",
            Self::PyannoteOnnxV3 => "pyannote_onnx_v3",
            Self::Auditok => "auditok",
            Self::Webrtc => "webrtc",
        }
    }
}

impl fmt::Display for VadMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for VadMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| format!("unknown VAD method '{}'", s.trim()))
    }
}

/// Source language passed to the transcriber when none is configured.
pub const DEFAULT_TRANSCRIBE_LANGUAGE: &str = "auto";

pub const DEFAULT_VAD_THRESHOLD: f32 = 0.4;

/// Application settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Resolution label (`360p` .. `4k`). Kept as text so unknown values
    /// survive a round trip and fall back at use time.
    pub download_resolution: Option<String>,

    pub subtitle_download_type: Option<SubtitleMode>,

    /// Pass `<data_root>/cookies.txt` to the extractor when it exists.
    pub use_cookie_file: Option<bool>,

    /// Selected transcription model.
    pub faster_whisper_model: Option<ModelId>,

    /// Custom models directory; overrides `VIDSCRIBE_MODELS_DIR`.
    pub model_dir_override: Option<String>,

    pub device: Option<Device>,

    /// Where videos are downloaded to.
    pub work_dir: Option<String>,

    /// Spoken language of the audio, or `auto` to detect it.
    pub transcribe_language: Option<String>,

    pub faster_whisper_vad_filter: Option<bool>,

    /// Speech probability above which a frame counts as voice, `0.0..=1.0`.
    pub faster_whisper_vad_threshold: Option<f32>,

    pub faster_whisper_vad_method: Option<VadMethod>,

    /// Separate vocals with MDX-Net before transcribing.
    pub faster_whisper_ff_mdx_kim2: Option<bool>,

    /// Word-level timestamps instead of the transcriber's own segments.
    pub faster_whisper_one_word: Option<bool>,

    /// Initial prompt handed to the transcriber.
    pub faster_whisper_prompt: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            download_resolution: Some(Resolution::P1080.as_str().to_string()),
            subtitle_download_type: Some(SubtitleMode::OfficialPreferred),
            use_cookie_file: Some(false),
            faster_whisper_model: None,
            model_dir_override: None,
            device: Some(Device::Cpu),
            work_dir: None,
            transcribe_language: Some(DEFAULT_TRANSCRIBE_LANGUAGE.to_string()),
            faster_whisper_vad_filter: Some(true),
            faster_whisper_vad_threshold: Some(DEFAULT_VAD_THRESHOLD),
            faster_whisper_vad_method: Some(VadMethod::default()),
            faster_whisper_ff_mdx_kim2: Some(false),
            faster_whisper_one_word: Some(true),
            faster_whisper_prompt: None,
        }
    }

    /// Parsed resolution, `None` when unset or unrecognised.
    #[must_use]
    pub fn effective_resolution(&self) -> Option<Resolution> {
        self.download_resolution.as_deref().and_then(Resolution::parse)
    }

    #[must_use]
    pub fn effective_subtitle_mode(&self) -> SubtitleMode {
        self.subtitle_download_type.unwrap_or_default()
    }

    #[must_use]
    pub fn effective_use_cookie_file(&self) -> bool {
        self.use_cookie_file.unwrap_or(false)
    }

    #[must_use]
    pub fn effective_device(&self) -> Device {
        self.device.unwrap_or_default()
    }

    #[must_use]
    pub fn effective_transcribe_language(&self) -> &str {
        self.transcribe_language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_TRANSCRIBE_LANGUAGE)
    }

    #[must_use]
    pub fn effective_vad_filter(&self) -> bool {
        self.faster_whisper_vad_filter.unwrap_or(true)
    }

    /// Stored threshold, or the default when unset or out of range.
    #[must_use]
    pub fn effective_vad_threshold(&self) -> f32 {
        self.faster_whisper_vad_threshold
            .filter(|t| (0.0..=1.0).contains(t))
            .unwrap_or(DEFAULT_VAD_THRESHOLD)
    }

    #[must_use]
    pub fn effective_vad_method(&self) -> VadMethod {
        self.faster_whisper_vad_method.unwrap_or_default()
    }

    #[must_use]
    pub fn effective_ff_mdx_kim2(&self) -> bool {
        self.faster_whisper_ff_mdx_kim2.unwrap_or(false)
    }

    #[must_use]
    pub fn effective_one_word(&self) -> bool {
        self.faster_whisper_one_word.unwrap_or(true)
    }

    /// Prompt text, `None` when unset or blank.
    #[must_use]
    pub fn effective_prompt(&self) -> Option<&str> {
        self.faster_whisper_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref resolution) = other.download_resolution {
            self.download_resolution.clone_from(resolution);
        }
        if let Some(ref mode) = other.subtitle_download_type {
            self.subtitle_download_type = *mode;
        }
        if let Some(ref use_cookie) = other.use_cookie_file {
            self.use_cookie_file = *use_cookie;
        }
        if let Some(ref model) = other.faster_whisper_model {
            self.faster_whisper_model = *model;
        }
        if let Some(ref dir) = other.model_dir_override {
            self.model_dir_override.clone_from(dir);
        }
        if let Some(ref device) = other.device {
            self.device = *device;
        }
        if let Some(ref dir) = other.work_dir {
            self.work_dir.clone_from(dir);
        }
        if let Some(ref language) = other.transcribe_language {
            self.transcribe_language.clone_from(language);
        }
        if let Some(filter) = other.faster_whisper_vad_filter {
            self.faster_whisper_vad_filter = filter;
        }
        if let Some(threshold) = other.faster_whisper_vad_threshold {
            self.faster_whisper_vad_threshold = threshold;
        }
        if let Some(method) = other.faster_whisper_vad_method {
            self.faster_whisper_vad_method = method;
        }
        if let Some(enabled) = other.faster_whisper_ff_mdx_kim2 {
            self.faster_whisper_ff_mdx_kim2 = enabled;
        }
        if let Some(enabled) = other.faster_whisper_one_word {
            self.faster_whisper_one_word = enabled;
        }
        if let Some(ref prompt) = other.faster_whisper_prompt {
            self.faster_whisper_prompt.clone_from(prompt);
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub download_resolution: Option<Option<String>>,
    pub subtitle_download_type: Option<Option<SubtitleMode>>,
    pub use_cookie_file: Option<Option<bool>>,
    pub faster_whisper_model: Option<Option<ModelId>>,
    pub model_dir_override: Option<Option<String>>,
    pub device: Option<Option<Device>>,
    pub work_dir: Option<Option<String>>,
    pub transcribe_language: Option<Option<String>>,
    pub faster_whisper_vad_filter: Option<Option<bool>>,
    pub faster_whisper_vad_threshold: Option<Option<f32>>,
    pub faster_whisper_vad_method: Option<Option<VadMethod>>,
    pub faster_whisper_ff_mdx_kim2: Option<Option<bool>>,
    pub faster_whisper_one_word: Option<Option<bool>>,
    pub faster_whisper_prompt: Option<Option<String>>,
}

/// Settings validation and persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Unknown resolution '{0}' (expected one of 360p, 480p, 720p, 1080p, 4k)")]
    InvalidResolution(String),

    #[error("{field} cannot be an empty path")]
    EmptyPath { field: &'static str },

    #[error("VAD threshold {0} is outside 0.0..=1.0")]
    InvalidVadThreshold(f32),

    #[error("{field} cannot be blank")]
    Blank { field: &'static str },

    #[error("Failed to read settings file: {0}")]
    Read(String),

    #[error("Failed to parse settings file: {0}")]
    Parse(String),

    #[error("Failed to write settings file: {0}")]
    Write(String),
}

/// Validate settings before they are saved.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(ref resolution) = settings.download_resolution {
        if Resolution::parse(resolution).is_none() {
            return Err(SettingsError::InvalidResolution(resolution.clone()));
        }
    }
    if settings
        .model_dir_override
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyPath {
            field: "model_dir_override",
        });
    }
    if settings
        .work_dir
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyPath { field: "work_dir" });
    }
    if let Some(threshold) = settings.faster_whisper_vad_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SettingsError::InvalidVadThreshold(threshold));
        }
    }
    if settings
        .transcribe_language
        .as_deref()
        .is_some_and(|l| l.trim().is_empty())
    {
        return Err(SettingsError::Blank {
            field: "transcribe_language",
        });
    }
    Ok(())
}

/// Load settings from `path`; a missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::with_defaults());
    }
    let raw = fs::read_to_string(path).map_err(|e| SettingsError::Read(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| SettingsError::Parse(e.to_string()))
}

/// Validate and write settings as pretty JSON, creating parent directories.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    validate_settings(settings)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SettingsError::Write(e.to_string()))?;
    }
    let json =
        serde_json::to_string_pretty(settings).map_err(|e| SettingsError::Write(e.to_string()))?;
    fs::write(path, json).map_err(|e| SettingsError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolution_parse() {
        assert_eq!(Resolution::parse("720P"), Some(Resolution::P720));
        assert_eq!(Resolution::parse("4K"), Some(Resolution::P4K));
        assert_eq!(Resolution::parse("8k"), None);
    }

    #[test]
    fn test_unknown_resolution_has_no_effective_value() {
        let settings = Settings {
            download_resolution: Some("potato".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.effective_resolution(), None);
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidResolution(_))
        ));
    }

    #[test]
    fn test_merge_only_touches_given_fields() {
        let mut settings = Settings::with_defaults();
        settings.merge(&SettingsUpdate {
            faster_whisper_model: Some(Some(ModelId::LargeV2)),
            device: Some(None),
            ..SettingsUpdate::default()
        });
        assert_eq!(settings.faster_whisper_model, Some(ModelId::LargeV2));
        assert_eq!(settings.device, None);
        assert_eq!(settings.effective_device(), Device::Cpu);
        assert_eq!(settings.download_resolution.as_deref(), Some("1080p"));
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("settings.json");

        assert_eq!(load_settings(&path).unwrap(), Settings::with_defaults());

        let mut settings = Settings::with_defaults();
        settings.subtitle_download_type = Some(SubtitleMode::Auto);
        settings.faster_whisper_model = Some(ModelId::LargeV3Turbo);
        save_settings(&path, &settings).unwrap();

        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_loads_with_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("settings.json");
        fs::write(&path, r#"{"use_cookie_file": true}"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert!(settings.effective_use_cookie_file());
        assert_eq!(settings.effective_subtitle_mode(), SubtitleMode::OfficialPreferred);
    }

    #[test]
    fn test_transcription_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.effective_transcribe_language(), "auto");
        assert!(settings.effective_vad_filter());
        assert!((settings.effective_vad_threshold() - 0.4).abs() < f32::EPSILON);
        assert_eq!(settings.effective_vad_method(), VadMethod::SileroV4);
        assert!(!settings.effective_ff_mdx_kim2());
        assert!(settings.effective_one_word());
        assert_eq!(settings.effective_prompt(), None);
        assert!(validate_settings(&Settings::with_defaults()).is_ok());
    }

    #[test]
    fn test_vad_threshold_must_be_a_probability() {
        for bad in [-0.1_f32, 1.5, f32::NAN] {
            let settings = Settings {
                faster_whisper_vad_threshold: Some(bad),
                ..Settings::default()
            };
            assert!(matches!(
                validate_settings(&settings),
                Err(SettingsError::InvalidVadThreshold(_))
            ));
            assert!((settings.effective_vad_threshold() - DEFAULT_VAD_THRESHOLD).abs() < f32::EPSILON);
        }
        for good in [0.0_f32, 0.55, 1.0] {
            let settings = Settings {
                faster_whisper_vad_threshold: Some(good),
                ..Settings::default()
            };
            assert!(validate_settings(&settings).is_ok());
        }
    }

    #[test]
    fn test_vad_method_parse() {
        assert_eq!("silero_v5".parse::<VadMethod>(), Ok(VadMethod::SileroV5));
        assert_eq!("Pyannote-Onnx-V3".parse::<VadMethod>(), Ok(VadMethod::PyannoteOnnxV3));
        assert!("energy".parse::<VadMethod>().is_err());
        assert_eq!(VadMethod::SileroV4Fw.to_string(), "silero_v4_fw");
    }

    #[test]
    fn test_transcription_fields_persist() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("settings.json");
        let mut settings = Settings::with_defaults();
        settings.merge(&SettingsUpdate {
            transcribe_language: Some(Some("ja".into())),
            faster_whisper_vad_threshold: Some(Some(0.25)),
            faster_whisper_vad_method: Some(Some(VadMethod::Webrtc)),
            faster_whisper_one_word: Some(Some(false)),
            faster_whisper_prompt: Some(Some("Names: Ada, Grace.".into())),
            ..SettingsUpdate::default()
        });
        save_settings(&path, &settings).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(r#""faster_whisper_vad_method": "webrtc""#));
        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.effective_transcribe_language(), "ja");
        assert!(!loaded.effective_one_word());
        assert_eq!(loaded.effective_prompt(), Some("Names: Ada, Grace."));
    }

    #[test]
    fn test_blank_language_is_rejected() {
        let settings = Settings {
            transcribe_language: Some(" ".into()),
            ..Settings::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::Blank { field: "transcribe_language" })
        ));
        assert_eq!(settings.effective_transcribe_language(), "auto");
    }

    #[test]
    fn test_save_rejects_blank_override() {
        let temp = tempdir().unwrap();
        let settings = Settings {
            model_dir_override: Some("  ".into()),
            ..Settings::default()
        };
        assert!(save_settings(&temp.path().join("s.json"), &settings).is_err());
    }
}

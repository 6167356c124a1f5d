//! Core domain types for vidscribe.
//!
//! This crate holds everything that does not touch the network or spawn
//! processes:
//! - Static catalogs of installable transcriber programs and models
//! - Filename sanitization
//! - Installed-asset probes
//! - Settings and path resolution
//! - Worker event types and the single-install gate

#![deny(unused_crate_dependencies)]

pub mod catalog;
pub mod events;
pub mod gate;
pub mod paths;
pub mod probe;
pub mod sanitize;
pub mod settings;

#[cfg(test)]
use tempfile as _;

pub use catalog::{
    ArtifactKind, InstallableModel, InstallableProgram, MODELS, ModelId, PROGRAMS, ProgramId,
    ProgramKind,
};
pub use events::{ProgressEvent, TerminalOutcome, WorkerEvent, WorkerState};
pub use gate::{GatePermit, InstallGate};
pub use paths::{
    DirectoryCreationStrategy, ModelsDirSource, PathError, ResolvedPaths, bin_dir,
    cookie_file_path, data_root, default_work_dir, ensure_directory, resolve_models_dir,
    settings_file_path,
};
pub use probe::{
    CPU_BINARY_NAME, Device, GPU_BUNDLE_DIR, GPU_BINARY_NAME, MODEL_WEIGHT_FILE, ProgramProbe,
    ReadinessError, available_devices, check_transcriber_ready, installed_models, probe_model,
    probe_program,
};
pub use sanitize::{DEFAULT_FILENAME, sanitize_filename, sanitize_filename_default};
pub use settings::{
    DEFAULT_TRANSCRIBE_LANGUAGE, DEFAULT_VAD_THRESHOLD, Resolution, Settings, SettingsError,
    SettingsUpdate, SubtitleMode, VadMethod, load_settings, save_settings, validate_settings,
};

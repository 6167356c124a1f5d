//! Presentation port for the install orchestrator.
//!
//! The orchestrator never renders anything itself; it tells the view what
//! changed. A terminal adapter draws progress bars, a GUI would toggle
//! widgets.

use vidscribe_core::{ModelId, ProgramId, ProgressEvent};

/// Installed models offered for selection plus the current pick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelChoices {
    pub available: Vec<ModelId>,
    pub selected: Option<ModelId>,
}

/// Receives state changes from the install orchestrator.
pub trait InstallView: Send + Sync {
    /// Enable or disable every download affordance.
    fn set_downloads_enabled(&self, enabled: bool);

    /// Enable or disable the download affordance of one model.
    fn set_model_row_enabled(&self, model: ModelId, enabled: bool);

    fn show_progress(&self, event: &ProgressEvent);

    /// Hide the progress display.
    fn clear_progress(&self);

    fn report_error(&self, message: &str);

    fn program_installed(&self, program: ProgramId);

    fn model_installed(&self, model: ModelId);

    fn set_model_choices(&self, choices: &ModelChoices);
}

/// A view that ignores all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopView;

impl InstallView for NoopView {
    fn set_downloads_enabled(&self, _enabled: bool) {}
    fn set_model_row_enabled(&self, _model: ModelId, _enabled: bool) {}
    fn show_progress(&self, _event: &ProgressEvent) {}
    fn clear_progress(&self) {}
    fn report_error(&self, _message: &str) {}
    fn program_installed(&self, _program: ProgramId) {}
    fn model_installed(&self, _model: ModelId) {}
    fn set_model_choices(&self, _choices: &ModelChoices) {}
}

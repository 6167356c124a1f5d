//! Terminal progress bars and the terminal install view.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use vidscribe_core::{ModelId, ProgramId, ProgressEvent};
use vidscribe_runtime::{InstallView, ModelChoices};

/// A single percent-based progress bar, created on first update.
#[derive(Default)]
pub struct CliProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn create_bar() -> ProgressBar {
        let pb = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    pub fn update(&self, event: &ProgressEvent) {
        let Ok(mut guard) = self.bar.lock() else { return };
        let pb = guard.get_or_insert_with(Self::create_bar);
        pb.set_position(u64::from(event.percent));
        pb.set_message(event.message.clone());
    }

    /// Print above the bar, or plainly when there is none.
    pub fn println(&self, msg: &str) {
        match self.bar.lock().ok().and_then(|g| g.clone()) {
            Some(pb) => pb.println(msg),
            None => println!("{msg}"),
        }
    }

    pub fn finish(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

/// Renders install orchestrator updates in the terminal.
#[derive(Default)]
pub struct CliInstallView {
    progress: CliProgress,
}

impl CliInstallView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstallView for CliInstallView {
    fn set_downloads_enabled(&self, enabled: bool) {
        debug!(enabled, "download commands toggled");
    }

    fn set_model_row_enabled(&self, model: ModelId, enabled: bool) {
        debug!(%model, enabled, "model row toggled");
    }

    fn show_progress(&self, event: &ProgressEvent) {
        self.progress.update(event);
    }

    fn clear_progress(&self) {
        self.progress.finish();
    }

    fn report_error(&self, message: &str) {
        self.progress.finish();
        eprintln!("✗ {message}");
    }

    fn program_installed(&self, program: ProgramId) {
        println!("✓ {} installed", program.program().label);
    }

    fn model_installed(&self, model: ModelId) {
        println!("✓ Model {} is ready", model.model().label);
    }

    fn set_model_choices(&self, choices: &ModelChoices) {
        if let Some(selected) = choices.selected {
            println!("Selected model: {selected}");
        }
    }
}

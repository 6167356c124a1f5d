//! Installation orchestrator.
//!
//! Coordinates program and model installs: gate, download, extraction or
//! rename, view updates. At most one install runs at a time; a second
//! request while one is active is rejected before anything touches disk.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use vidscribe_core::{
    ArtifactKind, CPU_BINARY_NAME, DirectoryCreationStrategy, InstallGate, InstallableProgram,
    ModelId, PROGRAMS, ProgramId, ProgressEvent, ReadinessError, TerminalOutcome, WorkerEvent, ensure_directory,
    installed_models, probe_model, probe_program,
};
use vidscribe_download::{
    ArchiveExtractWorker, ArchiveExtractor, DownloadWorker, ModelFetchWorker, ModelMirror,
    ResourceFetcher, WorkerHandle,
};

use super::error::{InstallError, InstallResult};
use super::prompt::InstallPrompt;
use super::view::{InstallView, ModelChoices};

/// Where installed assets live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub bin_dir: PathBuf,
    pub models_dir: PathBuf,
}

impl InstallLayout {
    pub fn model_dir(&self, model: ModelId) -> PathBuf {
        self.models_dir.join(model.model().dir_name)
    }
}

/// External collaborators of the orchestrator.
#[derive(Clone)]
pub struct InstallPorts {
    pub fetcher: Arc<dyn ResourceFetcher>,
    pub extractor: Arc<dyn ArchiveExtractor>,
    pub mirror: Arc<dyn ModelMirror>,
    pub view: Arc<dyn InstallView>,
    pub prompt: Arc<dyn InstallPrompt>,
}

/// How a model install request ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelInstallOutcome {
    /// Files were fetched into this directory.
    Downloaded(PathBuf),
    /// The model was already present and the user kept it.
    KeptExisting,
}

/// Drives program and model installations.
pub struct InstallationOrchestrator {
    layout: InstallLayout,
    gate: InstallGate,
    ports: InstallPorts,
    /// The install currently running, if any.
    active: Mutex<Option<ActiveInstall>>,
    next_op: AtomicU64,
    selected_model: Mutex<Option<ModelId>>,
}

struct Operation {
    id: u64,
    token: CancellationToken,
}

struct ActiveInstall {
    id: u64,
    token: CancellationToken,
    /// Model row disabled by this install.
    model: Option<ModelId>,
}

impl InstallationOrchestrator {
    pub fn new(layout: InstallLayout, ports: InstallPorts) -> Self {
        Self::with_gate(layout, ports, InstallGate::new())
    }

    /// Share a gate with other orchestrators.
    pub fn with_gate(layout: InstallLayout, ports: InstallPorts, gate: InstallGate) -> Self {
        Self {
            layout,
            gate,
            ports,
            active: Mutex::new(None),
            next_op: AtomicU64::new(1),
            selected_model: Mutex::new(None),
        }
    }

    /// Seed the current model selection (usually from settings).
    #[must_use]
    pub fn with_selected_model(self, model: Option<ModelId>) -> Self {
        *lock(&self.selected_model) = model;
        self
    }

    pub const fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    pub fn selected_model(&self) -> Option<ModelId> {
        *lock(&self.selected_model)
    }

    /// Whether an install currently holds the gate.
    pub fn is_busy(&self) -> bool {
        self.gate.is_held()
    }

    /// Catalog programs whose kind is not installed yet, in catalog order.
    pub fn list_missing_programs(&self) -> Vec<&'static InstallableProgram> {
        let probe = probe_program(&self.layout.bin_dir);
        PROGRAMS
            .iter()
            .filter(|p| !probe.kinds.contains(&p.kind))
            .collect()
    }

    /// Download and install a transcriber program.
    ///
    /// Returns the directory or binary that now holds the program.
    pub async fn start_program_install(&self, id: ProgramId) -> InstallResult<PathBuf> {
        let Some(permit) = self.gate.try_acquire() else {
            warn!(program = %id, "install rejected, another download is running");
            return Err(InstallError::AlreadyInProgress);
        };
        let program = id.program();
        info!(program = %id, url = program.url, "program install started");

        let op = self.begin_operation(None);
        self.ports.view.set_downloads_enabled(false);

        let result = self.install_program(program, &op.token).await;

        let owned = self.end_operation(&op);
        drop(permit);
        if owned {
            self.ports.view.clear_progress();
            self.ports.view.set_downloads_enabled(true);
        }

        match &result {
            Ok(path) => {
                info!(program = %id, path = %path.display(), "program installed");
                self.ports.view.program_installed(id);
            }
            Err(e) => self.report_failure("program", id.as_str(), e),
        }
        result
    }

    async fn install_program(
        &self,
        program: &'static InstallableProgram,
        op: &CancellationToken,
    ) -> InstallResult<PathBuf> {
        let bin_dir = &self.layout.bin_dir;
        ensure_directory(bin_dir, DirectoryCreationStrategy::AutoCreate)?;

        let dest = match program.artifact {
            ArtifactKind::Binary => {
                if bin_dir.join(CPU_BINARY_NAME).is_file() {
                    self.ports.prompt.warn(&format!(
                        "{CPU_BINARY_NAME} is already installed and will be replaced once the download completes"
                    ));
                }
                // The working binary stays in place until the new one is complete.
                bin_dir.join(format!("{}.part", program.file_name))
            }
            ArtifactKind::Archive => bin_dir.join(program.file_name),
        };
        let handle = DownloadWorker::start(
            Arc::clone(&self.ports.fetcher),
            program.url.to_string(),
            dest,
        );
        let downloaded = self.drive(handle, op, InstallError::Download).await?;

        match program.artifact {
            ArtifactKind::Binary => {
                let target = bin_dir.join(CPU_BINARY_NAME);
                if let Err(e) = tokio::fs::rename(&downloaded, &target).await {
                    if let Err(cleanup) = tokio::fs::remove_file(&downloaded).await {
                        warn!(path = %downloaded.display(), error = %cleanup, "failed to remove downloaded binary");
                    }
                    return Err(InstallError::Filesystem(format!(
                        "failed to rename {} to {}: {e}",
                        downloaded.display(),
                        target.display()
                    )));
                }
                Ok(target)
            }
            ArtifactKind::Archive => {
                if op.is_cancelled() {
                    return Err(InstallError::Cancelled);
                }
                self.ports.view.show_progress(&ProgressEvent::new(
                    100,
                    "Extracting files...",
                ));
                let handle = ArchiveExtractWorker::start(
                    Arc::clone(&self.ports.extractor),
                    downloaded,
                    bin_dir.clone(),
                );
                self.drive(handle, op, InstallError::Extraction).await
            }
        }
    }

    /// Download a model from its mirror.
    ///
    /// When the weight file already exists the prompt decides between
    /// re-downloading and keeping the current files.
    pub async fn start_model_install(&self, id: ModelId) -> InstallResult<ModelInstallOutcome> {
        let Some(permit) = self.gate.try_acquire() else {
            warn!(model = %id, "install rejected, another download is running");
            return Err(InstallError::AlreadyInProgress);
        };
        let model = id.model();
        self.ports.view.set_downloads_enabled(false);

        if probe_model(&self.layout.models_dir, model.dir_name) {
            let question = format!(
                "{} model files already exist. Download them again?",
                model.label
            );
            let redownload = match self.ports.prompt.confirm(&question, false) {
                Ok(answer) => answer,
                Err(e) => {
                    drop(permit);
                    self.ports.view.set_downloads_enabled(true);
                    self.report_failure("model", id.as_str(), &e);
                    return Err(e);
                }
            };
            if !redownload {
                info!(model = %id, "keeping existing model files");
                self.ports
                    .prompt
                    .info(&format!("Keeping the existing {} model files.", model.label));
                drop(permit);
                self.ports.view.set_downloads_enabled(true);
                self.ports.view.model_installed(id);
                self.refresh_model_choices();
                return Ok(ModelInstallOutcome::KeptExisting);
            }
        }

        info!(model = %id, mirror = model.mirror_id, "model install started");
        let op = self.begin_operation(Some(id));
        self.ports.view.set_model_row_enabled(id, false);

        let dest = self.layout.model_dir(id);
        let handle = ModelFetchWorker::start(
            Arc::clone(&self.ports.mirror),
            Arc::clone(&self.ports.fetcher),
            model.mirror_id.to_string(),
            dest,
        );
        let result = self.drive(handle, &op.token, InstallError::Download).await;

        let owned = self.end_operation(&op);
        drop(permit);
        if owned {
            self.ports.view.clear_progress();
            self.ports.view.set_downloads_enabled(true);
            self.ports.view.set_model_row_enabled(id, true);
        }

        match result {
            Ok(dir) => {
                info!(model = %id, dir = %dir.display(), "model installed");
                self.ports.view.model_installed(id);
                self.refresh_model_choices();
                Ok(ModelInstallOutcome::Downloaded(dir))
            }
            Err(e) => {
                self.report_failure("model", id.as_str(), &e);
                Err(e)
            }
        }
    }

    /// Rebuild the list of selectable (installed) models.
    ///
    /// Keeps the current selection when it is still installed, otherwise
    /// falls back to the first installed model, otherwise none.
    pub fn refresh_model_choices(&self) -> ModelChoices {
        let available = installed_models(&self.layout.models_dir);
        let selected = {
            let mut current = lock(&self.selected_model);
            let next = current
                .filter(|m| available.contains(m))
                .or_else(|| available.first().copied());
            *current = next;
            next
        };
        let choices = ModelChoices {
            available,
            selected,
        };
        debug!(?choices, "model choices refreshed");
        self.ports.view.set_model_choices(&choices);
        choices
    }

    /// Select an installed model.
    pub fn select_model(&self, model: ModelId) -> Result<(), ReadinessError> {
        if !probe_model(&self.layout.models_dir, model.model().dir_name) {
            return Err(ReadinessError::ModelMissing(model));
        }
        *lock(&self.selected_model) = Some(model);
        Ok(())
    }

    /// Cancel whatever is running and clear the gate unconditionally.
    ///
    /// The controls are re-enabled here; the cancelled install leaves
    /// them alone when it unwinds, since a newer install may own them by then.
    pub fn cancel_all(&self) {
        let cancelled = lock(&self.active).take();
        self.gate.force_release();
        if let Some(active) = cancelled {
            info!(op = active.id, "cancelling running install");
            active.token.cancel();
            self.ports.view.clear_progress();
            self.ports.view.set_downloads_enabled(true);
            if let Some(model) = active.model {
                self.ports.view.set_model_row_enabled(model, true);
            }
        }
    }

    /// Whether a program and the selected model are both installed.
    pub fn check_transcriber_ready(&self) -> Result<(), ReadinessError> {
        vidscribe_core::check_transcriber_ready(
            &self.layout.bin_dir,
            &self.layout.models_dir,
            self.selected_model(),
        )
    }

    fn begin_operation(&self, model: Option<ModelId>) -> Operation {
        let id = self.next_op.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        *lock(&self.active) = Some(ActiveInstall {
            id,
            token: token.clone(),
            model,
        });
        Operation { id, token }
    }

    /// Clear the active slot if `op` still owns it.
    ///
    /// Returns false when `cancel_all` already took the slot; the caller
    /// must then leave the view alone.
    fn end_operation(&self, op: &Operation) -> bool {
        let mut active = lock(&self.active);
        if active.as_ref().is_some_and(|a| a.id == op.id) {
            *active = None;
            true
        } else {
            false
        }
    }

    /// Forward worker progress to the view until the terminal outcome.
    ///
    /// Cancelling `op` cancels the worker.
    async fn drive<T: Send + 'static>(
        &self,
        mut handle: WorkerHandle<T>,
        op: &CancellationToken,
        on_failure: fn(String) -> InstallError,
    ) -> InstallResult<T> {
        let worker_token = handle.cancel_token();
        loop {
            tokio::select! {
                () = op.cancelled(), if !worker_token.is_cancelled() => {
                    debug!(worker = handle.name(), "forwarding cancellation");
                    worker_token.cancel();
                }
                event = handle.next_event() => match event {
                    Some(WorkerEvent::Progress(progress)) => self.ports.view.show_progress(&progress),
                    Some(WorkerEvent::Finished(outcome)) => {
                        return match outcome {
                            TerminalOutcome::Succeeded(value) => Ok(value),
                            TerminalOutcome::Failed(message) => Err(on_failure(message)),
                            TerminalOutcome::Cancelled => Err(InstallError::Cancelled),
                        };
                    }
                    None => return Err(on_failure(format!("{} ended without a result", handle.name()))),
                },
            }
        }
    }

    fn report_failure(&self, what: &str, id: &str, err: &InstallError) {
        if err.is_cancelled() {
            info!(%what, %id, "install cancelled");
            return;
        }
        error!(%what, %id, error = %err, "install failed");
        self.ports.view.report_error(&err.to_string());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

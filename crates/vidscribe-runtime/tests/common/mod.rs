//! Fakes shared by the orchestrator tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use vidscribe_core::{GPU_BINARY_NAME, GPU_BUNDLE_DIR, ModelId, ProgramId, ProgressEvent};
use vidscribe_download::{
    ArchiveExtractor, ByteProgress, DownloadError, ExtractError, MirrorFile, ModelMirror,
    ResourceFetcher, TextFetcher,
};
use vidscribe_runtime::{
    InstallLayout, InstallPorts, InstallPrompt, InstallResult, InstallView,
    InstallationOrchestrator, ModelChoices,
};

/// Everything the view was told, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    DownloadsEnabled(bool),
    RowEnabled(ModelId, bool),
    Progress(u8),
    ClearProgress,
    Error(String),
    ProgramInstalled(ProgramId),
    ModelInstalled(ModelId),
    Choices(ModelChoices),
}

#[derive(Debug, Default)]
pub struct RecordingView {
    calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ViewCall::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Last enable/disable of the global download affordances.
    pub fn downloads_enabled(&self) -> Option<bool> {
        self.calls().into_iter().rev().find_map(|c| match c {
            ViewCall::DownloadsEnabled(e) => Some(e),
            _ => None,
        })
    }

    fn push(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl InstallView for RecordingView {
    fn set_downloads_enabled(&self, enabled: bool) {
        self.push(ViewCall::DownloadsEnabled(enabled));
    }
    fn set_model_row_enabled(&self, model: ModelId, enabled: bool) {
        self.push(ViewCall::RowEnabled(model, enabled));
    }
    fn show_progress(&self, event: &ProgressEvent) {
        self.push(ViewCall::Progress(event.percent));
    }
    fn clear_progress(&self) {
        self.push(ViewCall::ClearProgress);
    }
    fn report_error(&self, message: &str) {
        self.push(ViewCall::Error(message.to_string()));
    }
    fn program_installed(&self, program: ProgramId) {
        self.push(ViewCall::ProgramInstalled(program));
    }
    fn model_installed(&self, model: ModelId) {
        self.push(ViewCall::ModelInstalled(model));
    }
    fn set_model_choices(&self, choices: &ModelChoices) {
        self.push(ViewCall::Choices(choices.clone()));
    }
}

/// Answers confirmations with a fixed value and keeps every notice.
#[derive(Debug)]
pub struct RecordingPrompt {
    answer: bool,
    infos: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl RecordingPrompt {
    pub fn new(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            infos: Mutex::new(Vec::new()),
            warnings: Mutex::new(Vec::new()),
        })
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl InstallPrompt for RecordingPrompt {
    fn confirm(&self, _message: &str, _default: bool) -> InstallResult<bool> {
        Ok(self.answer)
    }
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }
    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

/// How [`FakeFetcher`] behaves for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Succeed,
    Fail,
    /// Write a partial file, then wait for `release` or cancellation.
    Block,
}

pub struct FakeFetcher {
    mode: FetchMode,
    pub release: Notify,
    pub started: Notify,
    urls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(mode: FetchMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            release: Notify::new(),
            started: Notify::new(),
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceFetcher for FakeFetcher {
    async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: ByteProgress<'_>,
        cancel: &CancellationToken,
    ) -> Result<u64, DownloadError> {
        self.urls.lock().unwrap().push(url.to_string());
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = format!("contents of {url}");
        let total = body.len() as u64;
        tokio::fs::write(dest, &body.as_bytes()[..body.len() / 2]).await?;
        progress(total / 2, total);
        self.started.notify_one();

        match self.mode {
            FetchMode::Succeed => {}
            FetchMode::Fail => return Err(DownloadError::network("connection reset by peer")),
            FetchMode::Block => {
                tokio::select! {
                    () = cancel.cancelled() => return Err(DownloadError::Cancelled),
                    () = self.release.notified() => {}
                }
            }
        }
        tokio::fs::write(dest, body.as_bytes()).await?;
        progress(total, total);
        Ok(total)
    }
}

#[async_trait]
impl TextFetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, DownloadError> {
        self.urls.lock().unwrap().push(url.to_string());
        match self.mode {
            FetchMode::Fail => Err(DownloadError::network("connection reset by peer")),
            _ => Ok(format!("WEBVTT\n\n00:00.000 --> 00:01.000\nfrom {url}\n")),
        }
    }
}

/// Lays out the GPU bundle, or fails.
pub struct FakeExtractor {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            fail,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArchiveExtractor for FakeExtractor {
    async fn extract(
        &self,
        _archive: &Path,
        dest_dir: &Path,
        _cancel: CancellationToken,
    ) -> Result<(), ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ExtractError::corrupt("bad block at offset 42"));
        }
        let bundle = dest_dir.join(GPU_BUNDLE_DIR);
        std::fs::create_dir_all(&bundle)?;
        std::fs::write(bundle.join(GPU_BINARY_NAME), b"MZ")?;
        Ok(())
    }
}

/// Lists a fixed CTranslate2 model layout.
pub struct FakeMirror;

#[async_trait]
impl ModelMirror for FakeMirror {
    async fn list_files(&self, _model_id: &str) -> Result<Vec<MirrorFile>, DownloadError> {
        Ok(["model.bin", "config.json", "tokenizer.json", "vocabulary.txt"]
            .into_iter()
            .map(|path| MirrorFile {
                path: path.to_string(),
                size: 100,
            })
            .collect())
    }

    fn file_url(&self, model_id: &str, path: &str) -> String {
        format!("mirror://{model_id}/{path}")
    }
}

pub struct Harness {
    pub temp: tempfile::TempDir,
    pub layout: InstallLayout,
    pub view: Arc<RecordingView>,
    pub fetcher: Arc<FakeFetcher>,
    pub extractor: Arc<FakeExtractor>,
}

impl Harness {
    pub fn new(mode: FetchMode, extraction_fails: bool) -> Self {
        let temp = tempfile::tempdir().unwrap();
        let layout = InstallLayout {
            bin_dir: temp.path().join("bin"),
            models_dir: temp.path().join("models"),
        };
        Self {
            temp,
            layout,
            view: Arc::new(RecordingView::default()),
            fetcher: FakeFetcher::new(mode),
            extractor: FakeExtractor::new(extraction_fails),
        }
    }

    pub fn orchestrator(&self, prompt: Arc<dyn InstallPrompt>) -> InstallationOrchestrator {
        InstallationOrchestrator::new(
            self.layout.clone(),
            InstallPorts {
                fetcher: self.fetcher.clone(),
                extractor: self.extractor.clone(),
                mirror: Arc::new(FakeMirror),
                view: self.view.clone(),
                prompt,
            },
        )
    }

    /// Put a weight file in place as if the model had been installed.
    pub fn install_model_files(&self, model: ModelId) -> PathBuf {
        let dir = self.layout.model_dir(model);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("model.bin"), b"weights").unwrap();
        dir
    }
}

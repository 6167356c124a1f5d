//! Model repository mirrors.
//!
//! A model is a directory of files (`model.bin`, `config.json`,
//! `tokenizer.json`, ...). [`ModelFetchWorker`] lists them through a
//! [`ModelMirror`] and downloads each one with a [`ResourceFetcher`].

mod modelscope;

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use vidscribe_core::{MODEL_WEIGHT_FILE, ProgressEvent, TerminalOutcome};

use crate::error::DownloadError;
use crate::fetch::ResourceFetcher;
use crate::file::remove_partial;
use crate::progress::{TransferRate, format_rate};
use crate::worker::WorkerHandle;

pub use modelscope::{DEFAULT_MODELSCOPE_ENDPOINT, ModelScopeMirror};

/// One file in a model repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorFile {
    /// Path relative to the repository root, `/`-separated.
    pub path: String,
    /// Size in bytes, `0` when unknown.
    pub size: u64,
}

/// A source of model repositories.
#[async_trait]
pub trait ModelMirror: Send + Sync {
    /// List the downloadable files of `model_id`.
    async fn list_files(&self, model_id: &str) -> Result<Vec<MirrorFile>, DownloadError>;

    /// Direct download URL for one file.
    fn file_url(&self, model_id: &str, path: &str) -> String;
}

/// Downloads a whole model repository in the background.
pub struct ModelFetchWorker;

impl ModelFetchWorker {
    /// Fetch every file of `model_id` into `dest_dir`.
    ///
    /// The weight file is fetched last, so a directory only looks installed
    /// once everything else is in place. A failed file is removed; files
    /// already completed are kept.
    pub fn start(
        mirror: Arc<dyn ModelMirror>,
        fetcher: Arc<dyn ResourceFetcher>,
        model_id: String,
        dest_dir: PathBuf,
    ) -> WorkerHandle<PathBuf> {
        WorkerHandle::spawn("model-fetch", move |sink, cancel| async move {
            info!(%model_id, dest = %dest_dir.display(), "model download started");
            sink.emit_now(ProgressEvent::new(0, format!("Listing files of {model_id}...")));

            let files = tokio::select! {
                () = cancel.cancelled() => return TerminalOutcome::Cancelled,
                listed = mirror.list_files(&model_id) => listed,
            };
            let files = match files.and_then(download_plan) {
                Ok(files) => files,
                Err(e) => {
                    error!(%model_id, error = %e, "model listing failed");
                    return TerminalOutcome::Failed(e.to_string());
                }
            };

            let total: u64 = files.iter().map(|f| f.size).sum();
            let rate = TransferRate::start();
            let count = files.len();
            let mut completed: u64 = 0;

            for (index, file) in files.iter().enumerate() {
                let url = mirror.file_url(&model_id, &file.path);
                let dest = dest_dir.join(relative_path(&file.path));
                let label = format!("[{}/{count}] {}", index + 1, file.path);
                let base = completed;

                let on_bytes = |done: u64, _file_total: u64| {
                    let overall = base + done;
                    let percent = ProgressEvent::percent_of(overall, total);
                    let speed = format_rate(rate.bytes_per_sec(overall));
                    sink.emit(ProgressEvent::new(percent, format!("Downloading {label}: {percent}% {speed}")));
                };

                match fetcher.fetch(&url, &dest, &on_bytes, &cancel).await {
                    Ok(bytes) => completed += file.size.max(bytes),
                    Err(DownloadError::Cancelled) => {
                        remove_partial(&dest).await;
                        info!(%model_id, "model download cancelled");
                        return TerminalOutcome::Cancelled;
                    }
                    Err(e) => {
                        remove_partial(&dest).await;
                        error!(%model_id, file = %file.path, error = %e, "model file download failed");
                        return TerminalOutcome::Failed(format!("{}: {e}", file.path));
                    }
                }

                if cancel.is_cancelled() {
                    return TerminalOutcome::Cancelled;
                }
            }

            sink.emit_now(ProgressEvent::new(100, "Model download complete"));
            info!(%model_id, files = count, "model download finished");
            TerminalOutcome::Succeeded(dest_dir)
        })
    }
}

/// Validate a listing and order it for download.
///
/// Rejects empty listings and paths that would escape the model directory.
/// Moves the weight file to the end.
pub fn download_plan(mut files: Vec<MirrorFile>) -> Result<Vec<MirrorFile>, DownloadError> {
    if files.is_empty() {
        return Err(DownloadError::invalid_response("model repository lists no files"));
    }
    if let Some(bad) = files.iter().find(|f| !is_safe_relative(&f.path)) {
        return Err(DownloadError::invalid_response(format!(
            "unsafe file path in listing: {}",
            bad.path
        )));
    }
    files.sort_by_key(|f| is_weight_file(&f.path));
    Ok(files)
}

fn is_weight_file(path: &str) -> bool {
    path.rsplit('/').next() == Some(MODEL_WEIGHT_FILE)
}

fn is_safe_relative(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

fn relative_path(path: &str) -> PathBuf {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

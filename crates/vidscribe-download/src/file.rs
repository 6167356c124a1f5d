//! Single-file download worker.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};
use vidscribe_core::{ProgressEvent, TerminalOutcome};

use crate::error::DownloadError;
use crate::fetch::ResourceFetcher;
use crate::progress::{TransferRate, format_rate};
use crate::worker::WorkerHandle;

/// Downloads one URL to one file in the background.
pub struct DownloadWorker;

impl DownloadWorker {
    /// Start streaming `url` into `dest`.
    ///
    /// Ends with `Succeeded(dest)`, `Failed(message)` or `Cancelled`. The
    /// partially written file is removed on failure and cancellation.
    pub fn start(fetcher: Arc<dyn ResourceFetcher>, url: String, dest: PathBuf) -> WorkerHandle<PathBuf> {
        WorkerHandle::spawn("download", move |sink, cancel| async move {
            info!(%url, dest = %dest.display(), "download started");
            let rate = TransferRate::start();

            let on_bytes = |done: u64, total: u64| {
                let percent = ProgressEvent::percent_of(done, total);
                let speed = format_rate(rate.bytes_per_sec(done));
                sink.emit(ProgressEvent::new(percent, format!("Downloading: {percent}% {speed}")));
            };

            match fetcher.fetch(&url, &dest, &on_bytes, &cancel).await {
                Ok(_) if cancel.is_cancelled() => {
                    remove_partial(&dest).await;
                    TerminalOutcome::Cancelled
                }
                Ok(bytes) => {
                    sink.emit_now(ProgressEvent::new(100, "Download complete"));
                    info!(dest = %dest.display(), bytes, "download finished");
                    TerminalOutcome::Succeeded(dest)
                }
                Err(DownloadError::Cancelled) => {
                    info!(%url, "download cancelled");
                    remove_partial(&dest).await;
                    TerminalOutcome::Cancelled
                }
                Err(e) => {
                    error!(%url, error = %e, "download failed");
                    remove_partial(&dest).await;
                    TerminalOutcome::Failed(e.to_string())
                }
            }
        })
    }
}

/// Best-effort removal of a partial download.
pub(crate) async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove partial download"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    use crate::fetch::ByteProgress;

    /// Writes a fixed body, or fails / waits for cancellation after writing half.
    struct FakeFetcher {
        body: Vec<u8>,
        mode: Mode,
    }

    enum Mode {
        Complete,
        FailHalfway,
        StallHalfway,
    }

    #[async_trait]
    impl ResourceFetcher for FakeFetcher {
        async fn fetch(
            &self,
            _url: &str,
            dest: &Path,
            progress: ByteProgress<'_>,
            cancel: &CancellationToken,
        ) -> Result<u64, DownloadError> {
            let total = self.body.len() as u64;
            let half = self.body.len() / 2;
            tokio::fs::write(dest, &self.body[..half]).await?;
            progress(half as u64, total);
            match self.mode {
                Mode::Complete => {
                    tokio::fs::write(dest, &self.body).await?;
                    progress(total, total);
                    Ok(total)
                }
                Mode::FailHalfway => Err(DownloadError::network("connection reset")),
                Mode::StallHalfway => {
                    cancel.cancelled().await;
                    Err(DownloadError::Cancelled)
                }
            }
        }
    }

    fn fetcher(mode: Mode) -> Arc<dyn ResourceFetcher> {
        Arc::new(FakeFetcher {
            body: vec![7_u8; 1024],
            mode,
        })
    }

    #[tokio::test]
    async fn test_success_reports_destination_and_final_progress() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("tool.exe");
        let handle = DownloadWorker::start(fetcher(Mode::Complete), "http://x/tool.exe".into(), dest.clone());

        let mut last = None;
        let outcome = handle.wait(|p| last = Some(p)).await;

        assert_eq!(outcome, TerminalOutcome::Succeeded(dest.clone()));
        assert_eq!(last.map(|p| p.percent), Some(100));
        let written = tokio_test::assert_ok!(std::fs::read(&dest));
        assert_eq!(written.len(), 1024);
    }

    #[tokio::test]
    async fn test_failure_removes_partial_file() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("tool.exe");
        let handle = DownloadWorker::start(fetcher(Mode::FailHalfway), "http://x".into(), dest.clone());

        let outcome = handle.wait(|_| {}).await;
        assert!(matches!(outcome, TerminalOutcome::Failed(ref m) if m.contains("connection reset")));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_cancel_emits_cancelled_and_cleans_up() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("bundle.7z");
        let mut handle = DownloadWorker::start(fetcher(Mode::StallHalfway), "http://x".into(), dest.clone());

        // Wait for the first progress event so the partial file exists.
        let first = handle.next_event().await;
        assert!(matches!(first, Some(vidscribe_core::WorkerEvent::Progress(_))));
        handle.cancel();

        assert_eq!(handle.wait(|_| {}).await, TerminalOutcome::Cancelled);
        assert!(!dest.exists());
    }
}

//! Archive extraction.
//!
//! [`ArchiveExtractor`] is the seam; [`SevenZipExtractor`] shells out to
//! `7z`, [`ZipExtractor`] unpacks in-process and [`AutoExtractor`] picks
//! between them by file extension.

mod seven_zip;
mod zip_archive;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use vidscribe_core::{ProgressEvent, TerminalOutcome};

use crate::error::ExtractError;
use crate::worker::WorkerHandle;

pub use seven_zip::SevenZipExtractor;
pub use zip_archive::ZipExtractor;

/// Unpacks an archive into a directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArchiveExtractor: Send + Sync {
    /// Extract every entry of `archive` into `dest_dir`, overwriting existing
    /// files. Must return [`ExtractError::Cancelled`] once `cancel` fires.
    async fn extract(
        &self,
        archive: &Path,
        dest_dir: &Path,
        cancel: CancellationToken,
    ) -> Result<(), ExtractError>;
}

/// Archive formats we know how to unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    SevenZip,
    Zip,
}

impl ArchiveFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "7z" => Some(Self::SevenZip),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }
}

/// Dispatches to the extractor matching the archive extension.
///
/// The `7z` executable is located lazily, so machines without 7-Zip can
/// still unpack `.zip` archives.
#[derive(Debug, Clone, Default)]
pub struct AutoExtractor {
    seven_zip: Option<SevenZipExtractor>,
}

impl AutoExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `7z` configuration instead of searching `PATH`.
    #[must_use]
    pub fn with_seven_zip(mut self, extractor: SevenZipExtractor) -> Self {
        self.seven_zip = Some(extractor);
        self
    }
}

#[async_trait]
impl ArchiveExtractor for AutoExtractor {
    async fn extract(
        &self,
        archive: &Path,
        dest_dir: &Path,
        cancel: CancellationToken,
    ) -> Result<(), ExtractError> {
        match ArchiveFormat::detect(archive) {
            Some(ArchiveFormat::Zip) => ZipExtractor.extract(archive, dest_dir, cancel).await,
            Some(ArchiveFormat::SevenZip) => {
                let located;
                let seven_zip = match &self.seven_zip {
                    Some(configured) => configured,
                    None => {
                        located = SevenZipExtractor::locate()?;
                        &located
                    }
                };
                seven_zip.extract(archive, dest_dir, cancel).await
            }
            None => Err(ExtractError::UnsupportedFormat {
                file_name: file_name_of(archive),
            }),
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Runs an extractor in the background.
pub struct ArchiveExtractWorker;

impl ArchiveExtractWorker {
    /// Extract `archive` into `dest_dir`.
    ///
    /// On success the archive is deleted and the outcome is
    /// `Succeeded(dest_dir)`. On failure the archive is kept; files already
    /// written to `dest_dir` are not rolled back.
    pub fn start(
        extractor: Arc<dyn ArchiveExtractor>,
        archive: PathBuf,
        dest_dir: PathBuf,
    ) -> WorkerHandle<PathBuf> {
        WorkerHandle::spawn("extract", move |sink, cancel| async move {
            let name = file_name_of(&archive);
            info!(archive = %archive.display(), dest = %dest_dir.display(), "extraction started");
            sink.emit_now(ProgressEvent::new(0, format!("Extracting {name}...")));

            match extractor.extract(&archive, &dest_dir, cancel).await {
                Ok(()) => {
                    if let Err(e) = tokio::fs::remove_file(&archive).await {
                        warn!(archive = %archive.display(), error = %e, "failed to delete archive after extraction");
                    }
                    sink.emit_now(ProgressEvent::new(100, "Extraction complete"));
                    info!(dest = %dest_dir.display(), "extraction finished");
                    TerminalOutcome::Succeeded(dest_dir)
                }
                Err(ExtractError::Cancelled) => {
                    info!(archive = %archive.display(), "extraction cancelled");
                    TerminalOutcome::Cancelled
                }
                Err(e) => {
                    error!(archive = %archive.display(), error = %e, "extraction failed");
                    TerminalOutcome::Failed(e.to_string())
                }
            }
        })
    }
}

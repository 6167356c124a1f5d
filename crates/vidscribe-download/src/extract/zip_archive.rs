//! In-process `.zip` extraction.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::ArchiveExtractor;
use crate::error::ExtractError;

/// Unpacks `.zip` archives with the `zip` crate, preserving the entry tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipExtractor;

#[async_trait]
impl ArchiveExtractor for ZipExtractor {
    async fn extract(
        &self,
        archive: &Path,
        dest_dir: &Path,
        cancel: CancellationToken,
    ) -> Result<(), ExtractError> {
        let archive = archive.to_path_buf();
        let dest_dir = dest_dir.to_path_buf();
        tokio::task::spawn_blocking(move || extract_blocking(&archive, &dest_dir, &cancel))
            .await
            .map_err(|e| ExtractError::corrupt(format!("extraction task failed: {e}")))?
    }
}

fn extract_blocking(archive: &Path, dest_dir: &Path, cancel: &CancellationToken) -> Result<(), ExtractError> {
    let file = File::open(archive)?;
    let mut zip = ::zip::ZipArchive::new(file).map_err(|e| ExtractError::corrupt(e.to_string()))?;

    fs::create_dir_all(dest_dir)?;

    for i in 0..zip.len() {
        if cancel.is_cancelled() {
            return Err(ExtractError::Cancelled);
        }

        let mut entry = zip.by_index(i).map_err(|e| ExtractError::corrupt(e.to_string()))?;

        // Entries escaping the destination (`../`, absolute paths) are skipped.
        let Some(relative) = entry.enclosed_name() else {
            debug!(entry = entry.name(), "skipping unsafe zip entry");
            continue;
        };
        let target = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode))?;
        }
    }

    Ok(())
}

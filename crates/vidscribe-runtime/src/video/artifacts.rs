//! Locating the subtitle and thumbnail files the extractor wrote.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use vidscribe_download::TextFetcher;
use walkdir::WalkDir;

use super::error::VideoError;
use super::options::{SUBTITLE_MARKER, THUMBNAIL_PREFIX};

/// First file under `root` (recursive, name order) whose name starts with `prefix`.
pub fn find_first_with_prefix(root: &Path, prefix: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .map(walkdir::DirEntry::into_path)
}

pub fn find_thumbnail(home: &Path) -> Option<PathBuf> {
    find_first_with_prefix(home, THUMBNAIL_PREFIX)
}

/// Canonical location of a repaired subtitle.
pub fn repaired_subtitle_path(home: &Path, language: &str) -> PathBuf {
    home.join("subtitle")
        .join(format!("{SUBTITLE_MARKER}{language}.vtt"))
}

/// Find the written subtitle and replace it when it is in the wrong language.
///
/// A subtitle whose file name lacks `language` is deleted. When
/// `repair_url` is known the caption text is fetched and written to
/// [`repaired_subtitle_path`]; empty captions leave no subtitle.
pub async fn resolve_subtitle(
    home: &Path,
    language: Option<&str>,
    repair_url: Option<&str>,
    fetcher: &dyn TextFetcher,
) -> Result<Option<PathBuf>, VideoError> {
    let Some(found) = find_first_with_prefix(home, SUBTITLE_MARKER) else {
        debug!(home = %home.display(), "no subtitle written");
        return Ok(None);
    };

    let Some(language) = language else {
        return Ok(Some(found));
    };
    let file_name = found.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    if file_name.contains(language) {
        return Ok(Some(found));
    }

    info!(subtitle = %found.display(), %language, "subtitle language mismatch, replacing");
    tokio::fs::remove_file(&found).await?;

    let Some(url) = repair_url else {
        warn!(%language, "no caption track to repair the subtitle from");
        return Ok(None);
    };
    let text = fetcher.fetch_text(url).await?;
    if text.is_empty() {
        warn!(%url, "caption track is empty");
        return Ok(None);
    }

    let target = repaired_subtitle_path(home, language);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, text).await?;
    Ok(Some(target))
}

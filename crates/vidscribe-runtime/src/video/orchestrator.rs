//! Video download orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use vidscribe_core::{
    ProgressEvent, Resolution, Settings, SubtitleMode, TerminalOutcome, sanitize_filename_default,
};
use vidscribe_download::{ProgressSink, TextFetcher, WorkerHandle};

use super::artifacts::{find_thumbnail, resolve_subtitle};
use super::error::VideoError;
use super::extractor::VideoExtractor;
use super::info::{VideoInfo, caption_repair_url};
use super::options::{ExtractorOptions, OutputPaths};

/// Subfolder of the work directory that holds one folder per video.
pub const VIDEO_ROOT_DIR: &str = "videocap";

/// Download preferences, usually taken from [`Settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoSettings {
    pub resolution: Option<Resolution>,
    pub subtitle_mode: SubtitleMode,
    pub use_cookie_file: bool,
    pub cookie_path: Option<PathBuf>,
    pub write_thumbnail: bool,
}

impl VideoSettings {
    pub fn from_settings(settings: &Settings, cookie_path: Option<PathBuf>) -> Self {
        Self {
            resolution: settings.effective_resolution(),
            subtitle_mode: settings.effective_subtitle_mode(),
            use_cookie_file: settings.effective_use_cookie_file(),
            cookie_path,
            write_thumbnail: false,
        }
    }

    /// The cookie file, when enabled and present on disk.
    pub fn cookie_file(&self) -> Option<PathBuf> {
        if !self.use_cookie_file {
            return None;
        }
        self.cookie_path.clone().filter(|p| p.is_file())
    }
}

/// Everything resolved for one download call; dropped when it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoJobContext {
    pub url: String,
    pub work_dir: PathBuf,
    pub format: String,
    pub write_subtitles: bool,
    pub write_auto_subtitles: bool,
    /// Normalized language of the video, e.g. `en`.
    pub subtitle_language: Option<String>,
    /// Sanitized folder title.
    pub title: String,
}

impl VideoJobContext {
    fn new(url: &str, work_dir: &Path, options: &ExtractorOptions, info: &VideoInfo) -> Self {
        Self {
            url: url.to_string(),
            work_dir: work_dir.to_path_buf(),
            format: options.format.clone(),
            write_subtitles: options.write_subs,
            write_auto_subtitles: options.write_auto_subs,
            subtitle_language: info.language_code(),
            title: sanitize_filename_default(info.folder_title()),
        }
    }

    /// `work_dir/videocap/<title>`.
    pub fn home(&self) -> PathBuf {
        self.work_dir.join(VIDEO_ROOT_DIR).join(&self.title)
    }
}

/// Result of a finished video download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDownload {
    /// Folder holding everything for this video.
    pub home: PathBuf,
    /// `None` when the extractor produced no file at the expected path.
    pub video_path: Option<PathBuf>,
    pub subtitle_path: Option<PathBuf>,
    pub thumbnail_path: Option<PathBuf>,
    pub metadata: VideoInfo,
}

/// Downloads one video at a time with its subtitle and thumbnail.
pub struct VideoDownloadOrchestrator {
    extractor: Arc<dyn VideoExtractor>,
    text_fetcher: Arc<dyn TextFetcher>,
    settings: VideoSettings,
    busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl VideoDownloadOrchestrator {
    pub fn new(
        extractor: Arc<dyn VideoExtractor>,
        text_fetcher: Arc<dyn TextFetcher>,
        settings: VideoSettings,
    ) -> Self {
        Self {
            extractor,
            text_fetcher,
            settings,
            busy: AtomicBool::new(false),
        }
    }

    pub const fn settings(&self) -> &VideoSettings {
        &self.settings
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Download `url` into `work_dir/videocap/<title>`.
    pub async fn download(
        &self,
        url: &str,
        work_dir: &Path,
        progress: &ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<VideoDownload, VideoError> {
        let _busy = BusyGuard::acquire(&self.busy).ok_or(VideoError::Busy)?;

        let mut options = ExtractorOptions::new(self.settings.resolution, self.settings.subtitle_mode);
        options.write_thumbnail = self.settings.write_thumbnail;
        options.cookie_file = self.settings.cookie_file();

        progress.emit_now(ProgressEvent::new(0, "Reading video information..."));
        let info = self.extractor.extract_info(url, &options, cancel).await?;

        let job = VideoJobContext::new(url, work_dir, &options, &info);
        let repair_url = job
            .subtitle_language
            .as_deref()
            .and_then(|lang| caption_repair_url(&info.automatic_captions, lang));

        let home = job.home();
        tokio::fs::create_dir_all(&home).await?;
        info!(
            url = %job.url,
            home = %home.display(),
            language = ?job.subtitle_language,
            format = %job.format,
            "video download started"
        );

        let options = options.with_paths(OutputPaths::under(&home));
        if cancel.is_cancelled() {
            return Err(VideoError::Cancelled);
        }
        self.extractor
            .process_info(&info, &options, progress, cancel)
            .await?;

        let expected = self.extractor.prepare_filename(&info, &options).await?;
        let video_path = expected.is_file().then_some(expected);

        let subtitle_path = resolve_subtitle(
            &home,
            job.subtitle_language.as_deref(),
            repair_url.as_deref(),
            self.text_fetcher.as_ref(),
        )
        .await?;
        let thumbnail_path = find_thumbnail(&home);

        progress.emit_now(ProgressEvent::new(100, "Download complete"));
        info!(
            video = ?video_path,
            subtitle = ?subtitle_path,
            thumbnail = ?thumbnail_path,
            "video download finished"
        );
        Ok(VideoDownload {
            home,
            video_path,
            subtitle_path,
            thumbnail_path,
            metadata: info,
        })
    }
}

/// Runs a video download as a background worker.
pub struct VideoDownloadWorker;

impl VideoDownloadWorker {
    pub fn start(
        orchestrator: Arc<VideoDownloadOrchestrator>,
        url: String,
        work_dir: PathBuf,
    ) -> WorkerHandle<VideoDownload> {
        WorkerHandle::spawn("video-download", move |sink, cancel| async move {
            match orchestrator.download(&url, &work_dir, &sink, &cancel).await {
                Ok(download) => TerminalOutcome::Succeeded(download),
                Err(VideoError::Cancelled) => {
                    info!(%url, "video download cancelled");
                    TerminalOutcome::Cancelled
                }
                Err(e) => {
                    error!(%url, error = %e, "video download failed");
                    TerminalOutcome::Failed(e.to_string())
                }
            }
        })
    }
}

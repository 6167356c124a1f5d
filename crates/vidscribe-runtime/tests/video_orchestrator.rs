//! Video orchestrator tests with a scripted extractor.

mod common;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::{FakeFetcher, FetchMode};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use vidscribe_core::{ProgressEvent, Resolution, SubtitleMode, TerminalOutcome};
use vidscribe_download::ProgressSink;
use vidscribe_runtime::video::{
    ExtractorOptions, SUBTITLE_MARKER, VideoDownloadWorker, VideoError, VideoExtractor, VideoInfo,
    VideoSettings, VideoDownloadOrchestrator,
};

const INFO_EN: &str = r#"{
    "title": "Rust: ownership/borrowing?",
    "language": "en-US",
    "automatic_captions": {
        "en": [
            {"ext": "json3", "url": "https://captions.test/en.json3"},
            {"ext": "vtt", "url": "https://captions.test/en.vtt"}
        ],
        "de": [{"ext": "vtt", "url": "https://captions.test/de.vtt"}]
    }
}"#;

/// Writes what a real extractor would, according to the options it gets.
struct ScriptedExtractor {
    info: String,
    /// Language suffix of the subtitle file it writes; `None` writes none.
    subtitle_lang: Option<&'static str>,
    write_video: bool,
    hold: Option<Arc<Notify>>,
    seen: Mutex<Option<ExtractorOptions>>,
}

impl ScriptedExtractor {
    fn new(info: &str, subtitle_lang: Option<&'static str>) -> Self {
        Self {
            info: info.to_string(),
            subtitle_lang,
            write_video: true,
            hold: None,
            seen: Mutex::new(None),
        }
    }

    fn home(options: &ExtractorOptions) -> PathBuf {
        options.paths.as_ref().unwrap().home.clone()
    }
}

#[async_trait]
impl VideoExtractor for ScriptedExtractor {
    async fn extract_info(
        &self,
        _url: &str,
        _options: &ExtractorOptions,
        _cancel: &CancellationToken,
    ) -> Result<VideoInfo, VideoError> {
        VideoInfo::from_json(self.info.clone()).map_err(|e| VideoError::Metadata(e.to_string()))
    }

    async fn process_info(
        &self,
        _info: &VideoInfo,
        options: &ExtractorOptions,
        progress: &ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<(), VideoError> {
        *self.seen.lock().unwrap() = Some(options.clone());
        if let Some(hold) = &self.hold {
            tokio::select! {
                () = hold.notified() => {}
                () = cancel.cancelled() => return Err(VideoError::Cancelled),
            }
        }
        progress.emit_now(ProgressEvent::new(50, "Downloading: 50.0% speed 1.0MiB/s"));

        let paths = options.paths.as_ref().unwrap();
        if self.write_video {
            std::fs::write(paths.home.join("clip.mp4"), b"video")?;
        }
        if let Some(lang) = self.subtitle_lang {
            std::fs::create_dir_all(&paths.subtitle)?;
            std::fs::write(paths.subtitle.join(format!("{SUBTITLE_MARKER}.{lang}.vtt")), "WEBVTT")?;
        }
        if options.write_thumbnail {
            std::fs::write(paths.thumbnail.join("thumbnail.jpg"), b"jpg")?;
        }
        Ok(())
    }

    async fn prepare_filename(
        &self,
        _info: &VideoInfo,
        options: &ExtractorOptions,
    ) -> Result<PathBuf, VideoError> {
        Ok(Self::home(options).join("clip.mp4"))
    }
}

fn orchestrator(
    extractor: ScriptedExtractor,
    fetch: FetchMode,
    settings: VideoSettings,
) -> (Arc<VideoDownloadOrchestrator>, Arc<ScriptedExtractor>, Arc<FakeFetcher>) {
    let extractor = Arc::new(extractor);
    let fetcher = FakeFetcher::new(fetch);
    let orch = Arc::new(VideoDownloadOrchestrator::new(
        extractor.clone(),
        fetcher.clone(),
        settings,
    ));
    (orch, extractor, fetcher)
}

async fn run(orch: &VideoDownloadOrchestrator, work_dir: &Path) -> Result<vidscribe_runtime::VideoDownload, VideoError> {
    orch.download("https://video.test/watch?v=1", work_dir, &ProgressSink::discard(), &CancellationToken::new())
        .await
}

#[tokio::test]
async fn test_wrong_language_subtitle_is_repaired_from_captions() {
    let work = tempfile::tempdir().unwrap();
    let (orch, _, fetcher) = orchestrator(
        ScriptedExtractor::new(INFO_EN, Some("de")),
        FetchMode::Succeed,
        VideoSettings::default(),
    );

    let download = run(&orch, work.path()).await.unwrap();

    let home = work.path().join("videocap").join("Rust_ ownership_borrowing_");
    assert_eq!(download.home, home);
    assert_eq!(fetcher.urls(), ["https://captions.test/en.vtt"]);

    let repaired = home.join("subtitle").join("【下载字幕】en.vtt");
    assert_eq!(download.subtitle_path.as_deref(), Some(repaired.as_path()));
    assert!(std::fs::read_to_string(&repaired).unwrap().starts_with("WEBVTT"));
    assert!(!home.join("subtitle").join("【下载字幕】.de.vtt").exists());
    assert_eq!(download.video_path, Some(home.join("clip.mp4")));
}

#[tokio::test]
async fn test_matching_subtitle_is_kept() {
    let work = tempfile::tempdir().unwrap();
    let (orch, _, fetcher) = orchestrator(
        ScriptedExtractor::new(INFO_EN, Some("en")),
        FetchMode::Succeed,
        VideoSettings::default(),
    );

    let download = run(&orch, work.path()).await.unwrap();

    assert!(fetcher.urls().is_empty());
    let subtitle = download.subtitle_path.unwrap();
    assert!(subtitle.ends_with("subtitle/【下载字幕】.en.vtt"));
    assert!(download.thumbnail_path.is_none());
}

#[tokio::test]
async fn test_repair_network_error_propagates() {
    let work = tempfile::tempdir().unwrap();
    let (orch, _, _) = orchestrator(
        ScriptedExtractor::new(INFO_EN, Some("de")),
        FetchMode::Fail,
        VideoSettings::default(),
    );

    let err = run(&orch, work.path()).await.unwrap_err();
    assert!(matches!(err, VideoError::Network(_)));
    assert!(!orch.is_busy());
}

#[tokio::test]
async fn test_untitled_video_and_missing_file() {
    let work = tempfile::tempdir().unwrap();
    let mut extractor = ScriptedExtractor::new(r#"{"id": "x"}"#, None);
    extractor.write_video = false;
    let settings = VideoSettings {
        write_thumbnail: true,
        ..VideoSettings::default()
    };
    let (orch, _, _) = orchestrator(extractor, FetchMode::Succeed, settings);

    let download = run(&orch, work.path()).await.unwrap();

    let home = work.path().join("videocap").join("MyVideo");
    assert_eq!(download.home, home);
    assert_eq!(download.video_path, None);
    assert_eq!(download.subtitle_path, None);
    assert_eq!(download.thumbnail_path, Some(home.join("thumbnail.jpg")));
}

#[tokio::test]
async fn test_settings_shape_extractor_options() {
    let work = tempfile::tempdir().unwrap();
    let settings = VideoSettings {
        resolution: Some(Resolution::P720),
        subtitle_mode: SubtitleMode::OfficialOnly,
        use_cookie_file: true,
        cookie_path: Some(work.path().join("missing-cookies.txt")),
        write_thumbnail: false,
    };
    let (orch, extractor, _) = orchestrator(
        ScriptedExtractor::new(INFO_EN, None),
        FetchMode::Succeed,
        settings,
    );

    run(&orch, work.path()).await.unwrap();

    let seen = extractor.seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen.format.matches("height<=720").count(), 2);
    assert!(seen.write_subs);
    assert!(!seen.write_auto_subs);
    assert!(!seen.write_thumbnail);
    assert_eq!(seen.cookie_file, None);
}

#[tokio::test]
async fn test_second_download_is_rejected_while_busy() {
    let work = tempfile::tempdir().unwrap();
    let hold = Arc::new(Notify::new());
    let mut extractor = ScriptedExtractor::new(INFO_EN, None);
    extractor.hold = Some(hold.clone());
    let (orch, _, _) = orchestrator(extractor, FetchMode::Succeed, VideoSettings::default());

    let handle = VideoDownloadWorker::start(orch.clone(), "https://video.test/1".into(), work.path().to_path_buf());
    while !orch.is_busy() {
        tokio::task::yield_now().await;
    }

    assert_eq!(run(&orch, work.path()).await.unwrap_err(), VideoError::Busy);

    hold.notify_one();
    let mut percents = Vec::new();
    let outcome = handle.wait(|p| percents.push(p.percent)).await;
    assert!(matches!(outcome, TerminalOutcome::Succeeded(_)));
    assert_eq!(percents.last(), Some(&100));
    assert!(!orch.is_busy());
}

#[tokio::test]
async fn test_worker_reports_metadata_failure() {
    let work = tempfile::tempdir().unwrap();
    let (orch, _, _) = orchestrator(
        ScriptedExtractor::new("not json", None),
        FetchMode::Succeed,
        VideoSettings::default(),
    );

    let outcome = VideoDownloadWorker::start(orch, "https://video.test/1".into(), work.path().to_path_buf())
        .wait(|_| {})
        .await;
    assert!(matches!(outcome, TerminalOutcome::Failed(ref m) if m.contains("metadata")));
}

#[tokio::test]
async fn test_worker_cancel() {
    let work = tempfile::tempdir().unwrap();
    let mut extractor = ScriptedExtractor::new(INFO_EN, None);
    extractor.hold = Some(Arc::new(Notify::new()));
    let (orch, _, _) = orchestrator(extractor, FetchMode::Succeed, VideoSettings::default());

    let handle = VideoDownloadWorker::start(orch.clone(), "https://video.test/1".into(), work.path().to_path_buf());
    while !orch.is_busy() {
        tokio::task::yield_now().await;
    }
    handle.cancel();
    assert_eq!(handle.wait(|_| {}).await, TerminalOutcome::Cancelled);
    assert!(!orch.is_busy());
}

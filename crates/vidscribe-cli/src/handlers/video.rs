//! Video download handler.

use std::path::PathBuf;
use std::sync::Arc;

use vidscribe_core::paths::normalize_user_path;
use vidscribe_core::{Resolution, SettingsError, SubtitleMode, TerminalOutcome};
use vidscribe_runtime::{VideoDownload, VideoDownloadWorker, VideoSettings};

use super::cancel_on_ctrl_c;
use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::CliProgress;

/// Flags that override saved preferences for one download.
#[derive(Debug, Clone, Default)]
pub struct VideoArgs {
    pub url: String,
    pub work_dir: Option<PathBuf>,
    pub resolution: Option<String>,
    pub subtitles: Option<SubtitleMode>,
    pub thumbnail: bool,
}

/// Apply per-invocation overrides on top of the saved preferences.
pub fn apply_overrides(mut settings: VideoSettings, args: &VideoArgs) -> Result<VideoSettings, CliError> {
    if let Some(label) = args.resolution.as_deref() {
        let resolution = Resolution::parse(label)
            .ok_or_else(|| CliError::from(SettingsError::InvalidResolution(label.to_string())))?;
        settings.resolution = Some(resolution);
    }
    if let Some(mode) = args.subtitles {
        settings.subtitle_mode = mode;
    }
    settings.write_thumbnail |= args.thumbnail;
    Ok(settings)
}

/// `--work-dir`, then the saved work directory, then the platform default.
pub fn work_dir(ctx: &CliContext, flag: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    match ctx.settings.work_dir.as_deref() {
        Some(raw) => Ok(normalize_user_path(raw)?),
        None => Ok(ctx.paths.work_dir.clone()),
    }
}

pub async fn execute(ctx: &CliContext, args: VideoArgs) -> Result<(), CliError> {
    let settings = apply_overrides(ctx.video_settings(), &args)?;
    let work_dir = work_dir(ctx, args.work_dir.clone())?;
    let orchestrator = Arc::new(ctx.video_orchestrator(settings)?);

    let handle = VideoDownloadWorker::start(orchestrator, args.url, work_dir);
    let interrupt = cancel_on_ctrl_c({
        let token = handle.cancel_token();
        move || token.cancel()
    });

    let progress = CliProgress::new();
    let outcome = handle.wait(|event| progress.update(&event)).await;
    interrupt.abort();
    progress.finish();

    match outcome {
        TerminalOutcome::Succeeded(download) => {
            print_download(&download);
            Ok(())
        }
        TerminalOutcome::Failed(message) => Err(CliError::Download(message)),
        TerminalOutcome::Cancelled => Err(CliError::Cancelled),
    }
}

fn print_download(download: &VideoDownload) {
    println!("✓ Downloaded \"{}\"", download.metadata.folder_title());
    println!("  Folder:    {}", download.home.display());
    match &download.video_path {
        Some(path) => println!("  Video:     {}", path.display()),
        None => println!("  Video:     not found (the extractor wrote no file)"),
    }
    match &download.subtitle_path {
        Some(path) => println!("  Subtitle:  {}", path.display()),
        None => println!("  Subtitle:  none"),
    }
    if let Some(path) = &download.thumbnail_path {
        println!("  Thumbnail: {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_saved_preferences() {
        let saved = VideoSettings {
            resolution: Some(Resolution::P1080),
            ..VideoSettings::default()
        };
        let args = VideoArgs {
            resolution: Some("480p".into()),
            subtitles: Some(SubtitleMode::None),
            thumbnail: true,
            ..VideoArgs::default()
        };
        let merged = apply_overrides(saved, &args).unwrap();
        assert_eq!(merged.resolution, Some(Resolution::P480));
        assert_eq!(merged.subtitle_mode, SubtitleMode::None);
        assert!(merged.write_thumbnail);
    }

    #[test]
    fn test_no_overrides_keep_saved_preferences() {
        let saved = VideoSettings {
            resolution: Some(Resolution::P720),
            subtitle_mode: SubtitleMode::OfficialOnly,
            ..VideoSettings::default()
        };
        let merged = apply_overrides(saved.clone(), &VideoArgs::default()).unwrap();
        assert_eq!(merged, saved);
    }

    #[test]
    fn test_bad_resolution_is_a_config_error() {
        let args = VideoArgs {
            resolution: Some("8k".into()),
            ..VideoArgs::default()
        };
        let err = apply_overrides(VideoSettings::default(), &args).unwrap_err();
        assert_eq!(err.exit_code(), 78);
    }
}

//! Extractor options: format selection, subtitle flags, output layout.

use std::path::{Path, PathBuf};

use vidscribe_core::{Resolution, SubtitleMode};

/// Output file name prefix for subtitle tracks.
pub const SUBTITLE_MARKER: &str = "【下载字幕】";

/// Output file name prefix for the thumbnail.
pub const THUMBNAIL_PREFIX: &str = "thumbnail";

/// Output template for the video itself.
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "%(title).200s.%(ext)s";

const UNRESTRICTED_FORMAT: &str = "bestvideo+bestaudio/best";

/// Format selector for a resolution cap.
///
/// A missing or 4K cap selects the best streams without a height limit.
pub fn format_selector(resolution: Option<Resolution>) -> String {
    let height = match resolution {
        Some(Resolution::P360) => 360,
        Some(Resolution::P480) => 480,
        Some(Resolution::P720) => 720,
        Some(Resolution::P1080) => 1080,
        Some(Resolution::P4K) | None => return UNRESTRICTED_FORMAT.to_string(),
    };
    format!("bestvideo[height<={height}]+bestaudio/best[height<={height}]/best")
}

/// `(write_subs, write_auto_subs)` for a subtitle mode.
pub const fn subtitle_flags(mode: SubtitleMode) -> (bool, bool) {
    match mode {
        SubtitleMode::OfficialOnly => (true, false),
        SubtitleMode::OfficialPreferred => (true, true),
        SubtitleMode::Auto => (false, true),
        SubtitleMode::None => (false, false),
    }
}

/// Where the extractor writes each kind of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub home: PathBuf,
    pub subtitle: PathBuf,
    pub thumbnail: PathBuf,
}

impl OutputPaths {
    /// Video and thumbnail in `home`, subtitles in `home/subtitle`.
    pub fn under(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
            subtitle: home.join("subtitle"),
            thumbnail: home.to_path_buf(),
        }
    }
}

/// Everything the extractor needs besides the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorOptions {
    pub format: String,
    pub output_template: String,
    pub subtitle_template: String,
    pub thumbnail_template: String,
    /// Unset until the work directory is known (after metadata extraction).
    pub paths: Option<OutputPaths>,
    pub write_subs: bool,
    pub write_auto_subs: bool,
    pub write_thumbnail: bool,
    pub thumbnail_format: String,
    pub cookie_file: Option<PathBuf>,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            format: UNRESTRICTED_FORMAT.to_string(),
            output_template: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            subtitle_template: format!("{SUBTITLE_MARKER}.%(ext)s"),
            thumbnail_template: THUMBNAIL_PREFIX.to_string(),
            paths: None,
            write_subs: false,
            write_auto_subs: false,
            write_thumbnail: false,
            thumbnail_format: "jpg".to_string(),
            cookie_file: None,
        }
    }
}

impl ExtractorOptions {
    pub fn new(resolution: Option<Resolution>, subtitles: SubtitleMode) -> Self {
        let (write_subs, write_auto_subs) = subtitle_flags(subtitles);
        Self {
            format: format_selector(resolution),
            write_subs,
            write_auto_subs,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_paths(mut self, paths: OutputPaths) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Render as `yt-dlp` command line flags.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.format.clone(),
            "-o".to_string(),
            self.output_template.clone(),
            "-o".to_string(),
            format!("subtitle:{}", self.subtitle_template),
            "-o".to_string(),
            format!("thumbnail:{}", self.thumbnail_template),
        ];
        if let Some(paths) = &self.paths {
            for (kind, path) in [
                ("home", &paths.home),
                ("subtitle", &paths.subtitle),
                ("thumbnail", &paths.thumbnail),
            ] {
                args.push("-P".to_string());
                args.push(format!("{kind}:{}", path.display()));
            }
        }
        if self.write_subs {
            args.push("--write-subs".to_string());
        }
        if self.write_auto_subs {
            args.push("--write-auto-subs".to_string());
        }
        if self.write_thumbnail {
            args.push("--write-thumbnail".to_string());
            args.push("--convert-thumbnails".to_string());
            args.push(self.thumbnail_format.clone());
        }
        if let Some(cookies) = &self.cookie_file {
            args.push("--cookies".to_string());
            args.push(cookies.display().to_string());
        }
        args.push("--no-warnings".to_string());
        args
    }
}

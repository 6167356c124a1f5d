//! Video download with subtitle and thumbnail discovery.
//!
//! [`VideoDownloadOrchestrator`] reads metadata, lays out the work folder,
//! downloads through a [`VideoExtractor`] and then locates the files that
//! were written. Subtitles in the wrong language are replaced from the
//! automatic caption tracks.

mod artifacts;
mod error;
mod extractor;
mod info;
mod options;
mod orchestrator;
mod progress;

pub use artifacts::{find_first_with_prefix, find_thumbnail, repaired_subtitle_path, resolve_subtitle};
pub use error::VideoError;
pub use extractor::{DEFAULT_METADATA_TIMEOUT, VideoExtractor, YtDlpExtractor};
pub use info::{CaptionTrack, FALLBACK_TITLE, VideoInfo, caption_repair_url, normalize_language};
pub use options::{
    DEFAULT_OUTPUT_TEMPLATE, ExtractorOptions, OutputPaths, SUBTITLE_MARKER, THUMBNAIL_PREFIX,
    format_selector, subtitle_flags,
};
pub use orchestrator::{
    VIDEO_ROOT_DIR, VideoDownload, VideoDownloadOrchestrator, VideoDownloadWorker, VideoJobContext,
    VideoSettings,
};
pub use progress::{PROGRESS_TAG, ProgressParser, progress_template};

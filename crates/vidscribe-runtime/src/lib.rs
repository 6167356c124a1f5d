//! Orchestration layer for vidscribe.
//!
//! - [`install`]: transcriber program and model installation behind a
//!   single-install gate
//! - [`video`]: video download with subtitle repair
//!
//! Both orchestrators talk to the outside world only through ports
//! (fetchers, extractors, views, prompts), so adapters and tests can plug
//! in their own.

#![deny(unsafe_code)]

pub mod install;
pub mod video;

pub use install::{
    FixedAnswerPrompt, InstallError, InstallLayout, InstallPorts, InstallPrompt, InstallResult,
    InstallView, InstallationOrchestrator, ModelChoices, ModelInstallOutcome, NonInteractivePrompt,
    NoopView,
};
pub use video::{
    VideoDownload, VideoDownloadOrchestrator, VideoDownloadWorker, VideoError, VideoExtractor,
    VideoInfo, VideoSettings, YtDlpExtractor,
};

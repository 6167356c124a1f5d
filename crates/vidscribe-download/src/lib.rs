//! Background workers for vidscribe.
//!
//! Every worker returns a [`WorkerHandle`] that yields progress events and
//! then exactly one terminal outcome:
//! - [`DownloadWorker`] - stream one URL into one file
//! - [`ArchiveExtractWorker`] - unpack a `.7z` / `.zip` archive
//! - [`ModelFetchWorker`] - fetch a model repository from a mirror

#![deny(unused_crate_dependencies)]

pub mod error;
pub mod extract;
pub mod fetch;
pub mod file;
pub mod mirror;
pub mod progress;
pub mod worker;

#[cfg(test)]
use tempfile as _;

pub use error::{DownloadError, ExtractError};
pub use extract::{
    ArchiveExtractWorker, ArchiveExtractor, ArchiveFormat, AutoExtractor, SevenZipExtractor,
    ZipExtractor,
};
pub use fetch::{ByteProgress, HttpClientConfig, HttpFetcher, ResourceFetcher, TextFetcher};
pub use file::DownloadWorker;
pub use mirror::{
    DEFAULT_MODELSCOPE_ENDPOINT, MirrorFile, ModelFetchWorker, ModelMirror, ModelScopeMirror,
    download_plan,
};
pub use progress::{ProgressSink, ProgressThrottle, TransferRate, format_bytes, format_rate};
pub use worker::WorkerHandle;

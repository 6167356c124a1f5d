//! Resource fetching ports.
//!
//! Workers never talk to reqwest directly; they go through
//! [`ResourceFetcher`] so tests can substitute an in-memory fake.

mod http;

use std::path::Path;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::DownloadError;

pub use http::{HttpClientConfig, HttpFetcher};

/// Byte-level progress callback: `(downloaded_bytes, total_bytes)`.
///
/// `total_bytes` is `0` when the server did not announce a length.
pub type ByteProgress<'a> = &'a (dyn Fn(u64, u64) + Send + Sync);

/// Streams a remote resource into a local file.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Write `url` to `dest`, creating parent directories as needed.
    ///
    /// Returns the number of bytes written. Must return
    /// [`DownloadError::Cancelled`] promptly once `cancel` fires. Partial
    /// files are left for the caller to clean up.
    async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: ByteProgress<'_>,
        cancel: &CancellationToken,
    ) -> Result<u64, DownloadError>;
}

/// Fetches small text resources (subtitle files) into memory.
#[async_trait]
pub trait TextFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, DownloadError>;
}

//! reqwest-backed fetcher.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{ByteProgress, ResourceFetcher, TextFetcher};
use crate::error::DownloadError;

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Limit for establishing the connection.
    pub connect_timeout: Duration,
    /// Limit for waiting on headers or on any single body chunk.
    pub idle_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(60),
            user_agent: concat!("vidscribe/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Streaming HTTP downloader.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    idle_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &HttpClientConfig) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DownloadError::network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            idle_timeout: config.idle_timeout,
        })
    }

    /// Underlying client, shared with the mirror listing.
    pub const fn client(&self) -> &Client {
        &self.client
    }

    pub const fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    const fn idle_secs(&self) -> u64 {
        self.idle_timeout.as_secs()
    }

    /// Send a GET and fail on non-success statuses.
    async fn get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = tokio::time::timeout(self.idle_timeout, self.client.get(url).send())
            .await
            .map_err(|_| DownloadError::Timeout {
                seconds: self.idle_secs(),
            })?
            .map_err(|e| DownloadError::from_reqwest(&e, self.idle_secs()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::network_with_status(
                format!("HTTP {status} for {url}"),
                status.as_u16(),
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: ByteProgress<'_>,
        cancel: &CancellationToken,
    ) -> Result<u64, DownloadError> {
        debug!(%url, dest = %dest.display(), "starting HTTP transfer");

        let response = tokio::select! {
            () = cancel.cancelled() => return Err(DownloadError::Cancelled),
            response = self.get(url) => response?,
        };

        let total = response.content_length().unwrap_or(0);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = File::create(dest).await?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        progress(0, total);

        loop {
            let next = tokio::select! {
                () = cancel.cancelled() => return Err(DownloadError::Cancelled),
                next = tokio::time::timeout(self.idle_timeout, stream.next()) => next,
            };
            let chunk = match next {
                Err(_) => {
                    return Err(DownloadError::Timeout {
                        seconds: self.idle_secs(),
                    });
                }
                Ok(None) => break,
                Ok(Some(chunk)) => chunk.map_err(|e| DownloadError::from_reqwest(&e, self.idle_secs()))?,
            };
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            progress(downloaded, total);
        }

        file.flush().await?;
        debug!(%url, bytes = downloaded, "HTTP transfer complete");
        Ok(downloaded)
    }
}

#[async_trait]
impl TextFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, DownloadError> {
        let response = self.get(url).await?;
        tokio::time::timeout(self.idle_timeout, response.text())
            .await
            .map_err(|_| DownloadError::Timeout {
                seconds: self.idle_secs(),
            })?
            .map_err(|e| DownloadError::from_reqwest(&e, self.idle_secs()))
    }
}

//! ModelScope model hub.
//!
//! Listing: `GET {endpoint}/api/v1/models/{id}/repo/files?Recursive=true`.
//! Download: `GET {endpoint}/models/{id}/resolve/master/{path}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{MirrorFile, ModelMirror};
use crate::error::DownloadError;

pub const DEFAULT_MODELSCOPE_ENDPOINT: &str = "https://modelscope.cn";

/// Limit on waiting for the listing's headers or body.
pub const DEFAULT_LISTING_TIMEOUT: Duration = Duration::from_secs(60);

/// Files that are repository metadata rather than model content.
const SKIPPED_FILES: &[&str] = &[".gitattributes", "README.md", "configuration.json"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<ListData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListData {
    #[serde(default)]
    files: Vec<RepoEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RepoEntry {
    path: String,
    #[serde(rename = "Type", default)]
    kind: String,
    #[serde(default)]
    size: u64,
}

/// ModelScope-backed [`ModelMirror`].
#[derive(Debug, Clone)]
pub struct ModelScopeMirror {
    client: Client,
    endpoint: String,
    idle_timeout: Duration,
}

impl ModelScopeMirror {
    pub fn new(client: Client) -> Self {
        Self::with_endpoint(client, DEFAULT_MODELSCOPE_ENDPOINT)
    }

    pub fn with_endpoint(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            idle_timeout: DEFAULT_LISTING_TIMEOUT,
        }
    }

    /// Usually the fetcher's idle timeout, so listing and downloads stall out alike.
    #[must_use]
    pub const fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    const fn timed_out(&self) -> DownloadError {
        DownloadError::Timeout {
            seconds: self.idle_timeout.as_secs(),
        }
    }

    pub fn listing_url(&self, model_id: &str) -> String {
        format!(
            "{}/api/v1/models/{model_id}/repo/files?Recursive=true",
            self.endpoint
        )
    }
}

/// Turn a listing body into the files worth downloading.
pub(crate) fn parse_listing(body: &str) -> Result<Vec<MirrorFile>, DownloadError> {
    let response: ListResponse = serde_json::from_str(body)
        .map_err(|e| DownloadError::invalid_response(format!("bad listing JSON: {e}")))?;

    if let Some(code) = response.code {
        if code != 200 {
            return Err(DownloadError::invalid_response(format!(
                "mirror returned code {code}: {}",
                response.message.unwrap_or_default()
            )));
        }
    }

    let files = response
        .data
        .map(|d| d.files)
        .unwrap_or_default()
        .into_iter()
        .filter(|entry| entry.kind.is_empty() || entry.kind == "blob")
        .filter(|entry| !SKIPPED_FILES.contains(&entry.path.as_str()))
        .map(|entry| MirrorFile {
            path: entry.path,
            size: entry.size,
        })
        .collect();
    Ok(files)
}

#[async_trait]
impl ModelMirror for ModelScopeMirror {
    async fn list_files(&self, model_id: &str) -> Result<Vec<MirrorFile>, DownloadError> {
        let url = self.listing_url(model_id);
        debug!(%url, "listing model repository");

        let response = tokio::time::timeout(self.idle_timeout, self.client.get(&url).send())
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| DownloadError::network(format!("Failed to list {model_id}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::network_with_status(
                format!("listing {model_id} returned HTTP {status}"),
                status.as_u16(),
            ));
        }

        let body = tokio::time::timeout(self.idle_timeout, response.text())
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| DownloadError::network(e.to_string()))?;
        parse_listing(&body)
    }

    fn file_url(&self, model_id: &str, path: &str) -> String {
        format!("{}/models/{model_id}/resolve/master/{path}", self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{
        "Code": 200,
        "Data": {
            "Files": [
                {"Name": "model.bin", "Path": "model.bin", "Type": "blob", "Size": 483546902},
                {"Name": "config.json", "Path": "config.json", "Type": "blob", "Size": 2394},
                {"Name": ".gitattributes", "Path": ".gitattributes", "Type": "blob", "Size": 1519},
                {"Name": "extra", "Path": "extra", "Type": "tree", "Size": 0},
                {"Name": "vocabulary.txt", "Path": "extra/vocabulary.txt", "Type": "blob", "Size": 460}
            ]
        },
        "Message": "success",
        "Success": true
    }"#;

    #[test]
    fn test_listing_keeps_blobs_only() {
        let files = parse_listing(LISTING).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["model.bin", "config.json", "extra/vocabulary.txt"]);
        assert_eq!(files[0].size, 483_546_902);
    }

    #[test]
    fn test_listing_error_code() {
        let err = parse_listing(r#"{"Code": 10010205001, "Message": "model not found"}"#).unwrap_err();
        assert!(err.to_string().contains("model not found"));
    }

    #[test]
    fn test_urls() {
        let mirror = ModelScopeMirror::with_endpoint(Client::new(), "https://example.test/");
        assert_eq!(
            mirror.listing_url("pengzhendong/faster-whisper-small"),
            "https://example.test/api/v1/models/pengzhendong/faster-whisper-small/repo/files?Recursive=true"
        );
        assert_eq!(
            mirror.file_url("pengzhendong/faster-whisper-small", "model.bin"),
            "https://example.test/models/pengzhendong/faster-whisper-small/resolve/master/model.bin"
        );
    }
}

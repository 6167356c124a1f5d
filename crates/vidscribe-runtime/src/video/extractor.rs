//! Video extractor port and its `yt-dlp` implementation.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vidscribe_download::ProgressSink;

use super::error::VideoError;
use super::info::VideoInfo;
use super::options::ExtractorOptions;
use super::progress::{ProgressParser, progress_template};

/// Default bound on metadata extraction.
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(120);

/// Resolves, downloads and names videos.
#[async_trait]
pub trait VideoExtractor: Send + Sync {
    /// Fetch metadata only; nothing is written to disk.
    async fn extract_info(
        &self,
        url: &str,
        options: &ExtractorOptions,
        cancel: &CancellationToken,
    ) -> Result<VideoInfo, VideoError>;

    /// Download everything `options` asks for, reporting progress.
    async fn process_info(
        &self,
        info: &VideoInfo,
        options: &ExtractorOptions,
        progress: &ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<(), VideoError>;

    /// Path the video was (or would be) written to.
    async fn prepare_filename(
        &self,
        info: &VideoInfo,
        options: &ExtractorOptions,
    ) -> Result<PathBuf, VideoError>;
}

/// Drives the `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    program: PathBuf,
    metadata_timeout: Duration,
    parser: ProgressParser,
}

impl YtDlpExtractor {
    pub fn new(program: impl Into<PathBuf>) -> Result<Self, VideoError> {
        let parser = ProgressParser::new()
            .map_err(|e| VideoError::Process(format!("invalid progress pattern: {e}")))?;
        Ok(Self {
            program: program.into(),
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
            parser,
        })
    }

    /// Find `yt-dlp` on `PATH`.
    pub fn locate() -> Result<Self, VideoError> {
        let program = which::which("yt-dlp")
            .map_err(|_| VideoError::Process("yt-dlp was not found on PATH".to_string()))?;
        debug!(program = %program.display(), "using yt-dlp");
        Self::new(program)
    }

    #[must_use]
    pub const fn with_metadata_timeout(mut self, timeout: Duration) -> Self {
        self.metadata_timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.kill_on_drop(true)
            .stdin(Stdio::null())
            .env("PYTHONUNBUFFERED", "1");
        cmd
    }

    /// Run to completion, collecting output, bounded by `timeout`.
    ///
    /// Spawn failures and timeouts are mapped through `on_error`.
    async fn run_collect(
        &self,
        mut cmd: Command,
        timeout: Duration,
        cancel: &CancellationToken,
        on_error: fn(String) -> VideoError,
    ) -> Result<Output, VideoError> {
        let child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| on_error(format!("failed to start {}: {e}", self.program.display())))?;

        tokio::select! {
            () = cancel.cancelled() => Err(VideoError::Cancelled),
            waited = tokio::time::timeout(timeout, child.wait_with_output()) => match waited {
                Err(_) => Err(on_error(format!("timed out after {}s", timeout.as_secs()))),
                Ok(Err(e)) => Err(on_error(e.to_string())),
                Ok(Ok(output)) => Ok(output),
            },
        }
    }
}

fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .map_or_else(|| format!("exited with status {}", output.status), |l| l.trim().to_string())
}

/// Info JSON handed back to `yt-dlp` via `--load-info-json`.
fn write_info_file(info: &VideoInfo) -> Result<NamedTempFile, VideoError> {
    let file = tempfile::Builder::new()
        .prefix("vidscribe-")
        .suffix(".info.json")
        .tempfile()?;
    std::fs::write(file.path(), info.json.as_bytes())?;
    Ok(file)
}

#[async_trait]
impl VideoExtractor for YtDlpExtractor {
    async fn extract_info(
        &self,
        url: &str,
        options: &ExtractorOptions,
        cancel: &CancellationToken,
    ) -> Result<VideoInfo, VideoError> {
        let mut cmd = self.command();
        cmd.args(["--dump-single-json", "--no-playlist", "--no-warnings"]);
        if let Some(cookies) = &options.cookie_file {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.arg(url);

        info!(%url, "reading video metadata");
        let output = self
            .run_collect(cmd, self.metadata_timeout, cancel, VideoError::Metadata)
            .await?;
        if !output.status.success() {
            return Err(VideoError::Metadata(failure_reason(&output)));
        }
        let json = String::from_utf8_lossy(&output.stdout).into_owned();
        VideoInfo::from_json(json).map_err(|e| VideoError::Metadata(format!("invalid metadata: {e}")))
    }

    async fn process_info(
        &self,
        info: &VideoInfo,
        options: &ExtractorOptions,
        progress: &ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<(), VideoError> {
        let info_file = write_info_file(info)?;
        let mut cmd = self.command();
        cmd.arg("--load-info-json")
            .arg(info_file.path())
            .arg("--newline")
            .arg("--progress-template")
            .arg(progress_template())
            .args(options.to_args())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| VideoError::Process(format!("failed to start yt-dlp: {e}")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VideoError::Process("Missing stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| VideoError::Process("Missing stderr".to_string()))?;

        let mut lines = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr);
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr_reader.read_to_end(&mut buf).await;
            buf
        });

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    let _ = child.kill().await;
                    return Err(VideoError::Cancelled);
                }
                line = lines.next_line() => {
                    let line = line.map_err(|e| VideoError::Process(e.to_string()))?;
                    let Some(line) = line else { break };
                    if let Some(event) = self.parser.parse_line(&line) {
                        progress.emit(event);
                    } else if !line.trim().is_empty() {
                        debug!(target: "yt-dlp", "{line}");
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| VideoError::Process(e.to_string()))?;
        let stderr_buf = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let output = Output {
                status,
                stdout: Vec::new(),
                stderr: stderr_buf,
            };
            return Err(VideoError::Process(failure_reason(&output)));
        }
        Ok(())
    }

    async fn prepare_filename(
        &self,
        info: &VideoInfo,
        options: &ExtractorOptions,
    ) -> Result<PathBuf, VideoError> {
        let info_file = write_info_file(info)?;
        let mut cmd = self.command();
        cmd.arg("--load-info-json")
            .arg(info_file.path())
            .args(options.to_args())
            .args(["--print", "filename"]);

        let output = self
            .run_collect(cmd, self.metadata_timeout, &CancellationToken::new(), VideoError::Process)
            .await?;
        if !output.status.success() {
            return Err(VideoError::Process(failure_reason(&output)));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let name = stdout.lines().rev().find(|l| !l.trim().is_empty()).map(str::trim);
        name.map(PathBuf::from).ok_or_else(|| {
            warn!("yt-dlp printed no file name");
            VideoError::Process("yt-dlp printed no file name".to_string())
        })
    }
}

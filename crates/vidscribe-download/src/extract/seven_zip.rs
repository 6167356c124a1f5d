//! `7z` command-line extraction.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::ArchiveExtractor;
use crate::error::ExtractError;

/// Executable names tried, in order, when locating 7-Zip.
const SEVEN_ZIP_CANDIDATES: &[&str] = &["7z", "7za", "7zz"];

/// Upper bound for one extraction run.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Runs `7z x <archive> -o<dest> -y`.
#[derive(Debug, Clone)]
pub struct SevenZipExtractor {
    program: PathBuf,
    timeout: Duration,
}

impl SevenZipExtractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Find a 7-Zip executable on `PATH`.
    pub fn locate() -> Result<Self, ExtractError> {
        SEVEN_ZIP_CANDIDATES
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(Self::new)
            .ok_or_else(|| ExtractError::ToolMissing {
                tool: "7z".to_string(),
            })
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the executable.
    pub fn args(archive: &Path, dest_dir: &Path) -> Vec<String> {
        vec![
            "x".to_string(),
            archive.display().to_string(),
            format!("-o{}", dest_dir.display()),
            "-y".to_string(),
        ]
    }

    fn tool_name(&self) -> String {
        self.program.display().to_string()
    }
}

#[async_trait]
impl ArchiveExtractor for SevenZipExtractor {
    async fn extract(
        &self,
        archive: &Path,
        dest_dir: &Path,
        cancel: CancellationToken,
    ) -> Result<(), ExtractError> {
        tokio::fs::create_dir_all(dest_dir).await?;

        let args = Self::args(archive, dest_dir);
        debug!(program = %self.program.display(), ?args, "running 7z");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExtractError::Spawn {
                tool: self.tool_name(),
                message: e.to_string(),
            })?;

        // Dropping the wait future drops the child, which kills it.
        let output = tokio::select! {
            () = cancel.cancelled() => return Err(ExtractError::Cancelled),
            result = tokio::time::timeout(self.timeout, child.wait_with_output()) => match result {
                Err(_) => return Err(ExtractError::Timeout { seconds: self.timeout.as_secs() }),
                Ok(output) => output?,
            },
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ExtractError::Failed {
                status: output.status.to_string(),
                stderr: if stderr.is_empty() {
                    "no error output".to_string()
                } else {
                    stderr
                },
            });
        }

        Ok(())
    }
}

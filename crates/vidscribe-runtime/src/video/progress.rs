//! Parsing of extractor progress lines.
//!
//! The extractor is started with a progress template that prefixes every
//! progress line with [`PROGRESS_TAG`], followed by the percent and speed
//! strings separated by `|`:
//!
//! ```text
//! [vidscribe]  42.5%|  2.10MiB/s
//! ```
//!
//! Both strings may carry terminal color codes.

use regex::Regex;
use vidscribe_core::ProgressEvent;

pub const PROGRESS_TAG: &str = "[vidscribe]";

/// Value for `--progress-template`.
pub fn progress_template() -> String {
    format!("download:{PROGRESS_TAG} %(progress._percent_str)s|%(progress._speed_str)s")
}

/// Turns tagged stdout lines into progress events.
#[derive(Debug, Clone)]
pub struct ProgressParser {
    ansi: Regex,
}

impl ProgressParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            ansi: Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]")?,
        })
    }

    /// Remove ANSI escape sequences.
    pub fn strip_ansi<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        self.ansi.replace_all(text, "")
    }

    /// Parse one stdout line; lines without the tag yield `None`.
    pub fn parse_line(&self, line: &str) -> Option<ProgressEvent> {
        let payload = line.trim().strip_prefix(PROGRESS_TAG)?;
        let (percent_str, speed_str) = payload.split_once('|')?;
        let percent_str = self.strip_ansi(percent_str).trim().to_string();
        let speed_str = self.strip_ansi(speed_str).trim().to_string();

        let percent = percent_str
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .unwrap_or(0.0)
            .clamp(0.0, 100.0);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = percent as u8;
        Some(ProgressEvent::new(
            whole,
            format!("Downloading: {percent_str} speed {speed_str}"),
        ))
    }
}

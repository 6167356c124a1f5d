//! Transfer-rate tracking and byte formatting.

use std::time::Instant;

const KB: f64 = 1_000.0;
const MB: f64 = 1_000_000.0;
const GB: f64 = 1_000_000_000.0;

/// Average throughput since a transfer started.
#[derive(Debug, Clone, Copy)]
pub struct TransferRate {
    started: Instant,
}

impl TransferRate {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Bytes per second for `bytes` transferred so far.
    pub fn bytes_per_sec(&self, bytes: u64) -> f64 {
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed <= f64::EPSILON {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let bytes = bytes as f64;
        bytes / elapsed
    }
}

/// Format a byte count with decimal units (`1.4 GB`, `78.7 MB`).
pub fn format_bytes(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64;
    if value >= GB {
        format!("{:.2} GB", value / GB)
    } else if value >= MB {
        format!("{:.1} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Format a throughput (`3.1 MB/s`).
pub fn format_rate(bytes_per_sec: f64) -> String {
    if !bytes_per_sec.is_finite() || bytes_per_sec <= 0.0 {
        return "-- B/s".to_string();
    }
    if bytes_per_sec >= GB {
        format!("{:.2} GB/s", bytes_per_sec / GB)
    } else if bytes_per_sec >= MB {
        format!("{:.1} MB/s", bytes_per_sec / MB)
    } else if bytes_per_sec >= KB {
        format!("{:.1} KB/s", bytes_per_sec / KB)
    } else {
        format!("{bytes_per_sec:.0} B/s")
    }
}

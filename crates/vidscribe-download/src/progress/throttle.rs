//! Progress throttling.

use std::time::{Duration, Instant};

/// Default spacing between two progress events.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Rate-limiter for progress updates.
///
/// Lets through the first update, then at most one per `min_interval`.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Whether an update may go out now. Records the emission when it may.
    pub fn should_emit(&mut self) -> bool {
        self.should_emit_at(Instant::now())
    }

    /// Same as [`should_emit`](Self::should_emit) with an explicit clock.
    pub fn should_emit_at(&mut self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) if now.saturating_duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Force the next check to return true.
    pub const fn reset(&mut self) {
        self.last_emit = None;
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_passes() {
        let mut throttle = ProgressThrottle::default();
        assert!(throttle.should_emit());
        assert_eq!(throttle.min_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_updates_inside_interval_are_dropped() {
        let start = Instant::now();
        let mut throttle = ProgressThrottle::new(Duration::from_millis(100));
        assert!(throttle.should_emit_at(start));
        assert!(!throttle.should_emit_at(start + Duration::from_millis(40)));
        assert!(!throttle.should_emit_at(start + Duration::from_millis(99)));
        assert!(throttle.should_emit_at(start + Duration::from_millis(100)));
        assert!(!throttle.should_emit_at(start + Duration::from_millis(150)));
    }

    #[test]
    fn test_reset_allows_immediate_update() {
        let start = Instant::now();
        let mut throttle = ProgressThrottle::new(Duration::from_secs(10));
        assert!(throttle.should_emit_at(start));
        throttle.reset();
        assert!(throttle.should_emit_at(start));
    }
}

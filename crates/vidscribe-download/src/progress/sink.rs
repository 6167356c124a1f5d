//! Worker-side progress channel.

use std::sync::Mutex;

use tokio::sync::mpsc;
use vidscribe_core::ProgressEvent;

use super::throttle::ProgressThrottle;

/// Sends throttled [`ProgressEvent`]s to whoever holds the worker handle.
///
/// Sending never blocks; events sent after the receiver is gone are
/// discarded.
#[derive(Debug)]
pub struct ProgressSink {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
    throttle: Mutex<ProgressThrottle>,
}

impl ProgressSink {
    pub fn new(tx: mpsc::UnboundedSender<ProgressEvent>) -> Self {
        Self::with_throttle(tx, ProgressThrottle::default())
    }

    pub fn with_throttle(tx: mpsc::UnboundedSender<ProgressEvent>, throttle: ProgressThrottle) -> Self {
        Self {
            tx: Some(tx),
            throttle: Mutex::new(throttle),
        }
    }

    /// A sink plus the receiving end, using the default throttle.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// A sink that drops everything.
    pub fn discard() -> Self {
        Self {
            tx: None,
            throttle: Mutex::new(ProgressThrottle::default()),
        }
    }

    /// Send `event` unless an update went out within the throttle interval.
    pub fn emit(&self, event: ProgressEvent) {
        let allowed = self
            .throttle
            .lock()
            .map_or(true, |mut throttle| throttle.should_emit());
        if allowed {
            self.send(event);
        }
    }

    /// Send `event` regardless of the throttle.
    pub fn emit_now(&self, event: ProgressEvent) {
        if let Ok(mut throttle) = self.throttle.lock() {
            throttle.reset();
            throttle.should_emit();
        }
        self.send(event);
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            if tx.send(event).is_err() {
                tracing::trace!("progress receiver dropped");
            }
        }
    }
}

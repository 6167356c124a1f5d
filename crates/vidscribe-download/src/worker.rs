//! Generic worker handle.
//!
//! A worker is a spawned tokio task that reports progress through a
//! [`ProgressSink`] and ends with exactly one [`TerminalOutcome`]. The
//! handle delivers every progress event before the terminal one.

use std::future::Future;

use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use vidscribe_core::{ProgressEvent, TerminalOutcome, WorkerEvent, WorkerState};

use crate::progress::ProgressSink;

/// Caller-side handle for a running worker.
#[derive(Debug)]
pub struct WorkerHandle<T> {
    name: &'static str,
    progress: mpsc::UnboundedReceiver<ProgressEvent>,
    outcome: Option<oneshot::Receiver<TerminalOutcome<T>>>,
    state: watch::Receiver<WorkerState>,
    cancel: CancellationToken,
}

impl<T: Send + 'static> WorkerHandle<T> {
    /// Spawn `task` on the current tokio runtime.
    ///
    /// The task receives the progress sink and the cancellation token; the
    /// outcome it returns becomes the single terminal event.
    pub fn spawn<F, Fut>(name: &'static str, task: F) -> Self
    where
        F: FnOnce(ProgressSink, CancellationToken) -> Fut,
        Fut: Future<Output = TerminalOutcome<T>> + Send + 'static,
    {
        Self::spawn_with_token(name, CancellationToken::new(), task)
    }

    /// Like [`spawn`](Self::spawn) with a caller-provided token, so a parent
    /// operation can cancel several workers at once.
    pub fn spawn_with_token<F, Fut>(name: &'static str, cancel: CancellationToken, task: F) -> Self
    where
        F: FnOnce(ProgressSink, CancellationToken) -> Fut,
        Fut: Future<Output = TerminalOutcome<T>> + Send + 'static,
    {
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let (state_tx, state_rx) = watch::channel(WorkerState::Running);

        let fut = task(ProgressSink::new(progress_tx), cancel.clone());
        tokio::spawn(async move {
            let outcome = fut.await;
            debug!(worker = name, state = %outcome.state(), "worker finished");
            state_tx.send_replace(outcome.state());
            if outcome_tx.send(outcome).is_err() {
                debug!(worker = name, "worker handle dropped before completion");
            }
        });

        Self {
            name,
            progress: progress_rx,
            outcome: Some(outcome_rx),
            state: state_rx,
            cancel,
        }
    }

    /// Next event, or `None` once the terminal event has been delivered.
    pub async fn next_event(&mut self) -> Option<WorkerEvent<T>> {
        if let Some(event) = self.progress.recv().await {
            return Some(WorkerEvent::Progress(event));
        }
        let outcome_rx = self.outcome.take()?;
        let outcome = outcome_rx.await.unwrap_or_else(|_| {
            warn!(worker = self.name, "worker task ended without an outcome");
            TerminalOutcome::Failed(format!("{} stopped unexpectedly", self.name))
        });
        Some(WorkerEvent::Finished(outcome))
    }

    /// Drive the worker to completion, passing each progress event to
    /// `on_progress`.
    pub async fn wait(mut self, mut on_progress: impl FnMut(ProgressEvent)) -> TerminalOutcome<T> {
        while let Some(event) = self.next_event().await {
            match event {
                WorkerEvent::Progress(progress) => on_progress(progress),
                WorkerEvent::Finished(outcome) => return outcome,
            }
        }
        TerminalOutcome::Failed(format!("{} already finished", self.name))
    }

    /// Request cancellation. The worker stops at its next checkpoint and
    /// reports `Cancelled`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared with the worker task.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_progress_arrives_before_outcome() {
        let mut handle = WorkerHandle::spawn("test", |sink, _cancel| async move {
            sink.emit_now(ProgressEvent::new(10, "a"));
            sink.emit_now(ProgressEvent::new(60, "b"));
            TerminalOutcome::Succeeded(7_u32)
        });

        let mut seen = Vec::new();
        while let Some(event) = handle.next_event().await {
            seen.push(event);
        }
        assert_eq!(seen.len(), 3);
        assert!(matches!(seen[0], WorkerEvent::Progress(ref p) if p.percent == 10));
        assert!(matches!(seen[1], WorkerEvent::Progress(ref p) if p.percent == 60));
        assert_eq!(seen[2], WorkerEvent::Finished(TerminalOutcome::Succeeded(7)));
        assert_eq!(handle.state(), WorkerState::Succeeded);
    }

    #[tokio::test]
    async fn test_cancel_reaches_task() {
        let handle = WorkerHandle::<()>::spawn("test", |_sink, cancel| async move {
            tokio::select! {
                () = cancel.cancelled() => TerminalOutcome::Cancelled,
                () = tokio::time::sleep(Duration::from_secs(30)) => TerminalOutcome::Succeeded(()),
            }
        });
        assert_eq!(handle.state(), WorkerState::Running);
        handle.cancel();
        assert_eq!(handle.wait(|_| {}).await, TerminalOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_panicking_task_reports_failure() {
        let handle = WorkerHandle::<()>::spawn("boom", |_sink, _cancel| async move {
            panic!("worker exploded");
        });
        let outcome = handle.wait(|_| {}).await;
        assert!(matches!(outcome, TerminalOutcome::Failed(ref m) if m.contains("boom")));
    }

    #[tokio::test]
    async fn test_shared_token_cancels_worker() {
        let parent = CancellationToken::new();
        let handle = WorkerHandle::<()>::spawn_with_token("child", parent.clone(), |_s, cancel| async move {
            cancel.cancelled().await;
            TerminalOutcome::Cancelled
        });
        parent.cancel();
        assert_eq!(handle.wait(|_| {}).await, TerminalOutcome::Cancelled);
    }
}

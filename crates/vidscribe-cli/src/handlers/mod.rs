//! Command handlers.
//!
//! Handlers are thin: parse CLI-specific input, call into the runtime
//! orchestrators, format the result for the terminal.

pub mod config;
pub mod models;
pub mod paths;
pub mod programs;
pub mod status;
pub mod video;

use tokio::task::JoinHandle;
use tracing::info;

/// Run `cancel` when Ctrl-C is pressed. Abort the returned task once the
/// guarded operation is over.
pub(crate) fn cancel_on_ctrl_c<F>(cancel: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling");
            cancel();
        }
    })
}

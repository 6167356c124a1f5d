//! Progress plumbing shared by every worker.
//!
//! - [`ProgressThrottle`] rate-limits updates
//! - [`ProgressSink`] is the worker-side end of the progress channel
//! - [`TransferRate`] and the formatting helpers build the human-readable lines

mod rate;
mod sink;
mod throttle;

pub use rate::{TransferRate, format_bytes, format_rate};
pub use sink::ProgressSink;
pub use throttle::ProgressThrottle;

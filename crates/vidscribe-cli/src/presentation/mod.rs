//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no domain decisions.

pub mod progress;
pub mod tables;

pub use progress::{CliInstallView, CliProgress};
pub use tables::{installed_mark, print_separator, truncate_string};

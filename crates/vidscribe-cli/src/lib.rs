//! Command-line front end for vidscribe.
//!
//! Installs Faster-Whisper builds and models and downloads videos with
//! their subtitles. `main.rs` only parses arguments and dispatches to
//! [`handlers`].

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by main.rs only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod utils;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, ConfigCommand, ModelsCommand, ProgramsCommand};
pub use error::CliError;
pub use parser::Cli;

//! Stdin-backed install prompt.

use std::io::IsTerminal;

use vidscribe_runtime::{InstallError, InstallPrompt, InstallResult};

use super::input::prompt_confirmation;

/// Asks on the terminal; refuses when stdin is not a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliPrompt;

impl InstallPrompt for CliPrompt {
    fn confirm(&self, message: &str, default: bool) -> InstallResult<bool> {
        if !std::io::stdin().is_terminal() {
            return Err(InstallError::prompt_required(format!(
                "{message} (pass --yes or --keep when not running interactively)"
            )));
        }
        prompt_confirmation(message, default).map_err(|e| InstallError::Filesystem(e.to_string()))
    }

    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("⚠ {message}");
    }
}

//! User prompt abstraction for install operations.
//!
//! The orchestrator asks before overwriting an installed model; adapters
//! decide how (stdin, dialog, flag). The default `NonInteractivePrompt`
//! refuses rather than guessing.

use super::error::{InstallError, InstallResult};

/// Handles user confirmations during installation.
pub trait InstallPrompt: Send + Sync {
    /// Ask the user to confirm an action.
    ///
    /// Returns `Ok(true)` / `Ok(false)` for yes / no and
    /// `Err(InstallError::PromptRequired)` when nobody can answer.
    fn confirm(&self, message: &str, default: bool) -> InstallResult<bool>;

    /// Display an informational message to the user.
    fn info(&self, message: &str);

    /// Display a warning message to the user.
    fn warn(&self, message: &str);
}

/// Prompt for contexts without a user; every confirmation is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractivePrompt;

impl InstallPrompt for NonInteractivePrompt {
    fn confirm(&self, message: &str, _default: bool) -> InstallResult<bool> {
        Err(InstallError::prompt_required(message))
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Answers every confirmation with a fixed value (`--yes` / `--keep`).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswerPrompt {
    answer: bool,
}

impl FixedAnswerPrompt {
    pub const fn always_yes() -> Self {
        Self { answer: true }
    }

    pub const fn always_no() -> Self {
        Self { answer: false }
    }
}

impl InstallPrompt for FixedAnswerPrompt {
    fn confirm(&self, message: &str, _default: bool) -> InstallResult<bool> {
        tracing::debug!(answer = self.answer, "auto-answering: {message}");
        Ok(self.answer)
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_interactive_returns_error() {
        match NonInteractivePrompt.confirm("Download again?", true) {
            Err(InstallError::PromptRequired { message }) => assert_eq!(message, "Download again?"),
            other => panic!("expected PromptRequired, got {other:?}"),
        }
    }

    #[test]
    fn test_fixed_answers() {
        assert!(FixedAnswerPrompt::always_yes().confirm("?", false).unwrap());
        assert!(!FixedAnswerPrompt::always_no().confirm("?", true).unwrap());
    }
}

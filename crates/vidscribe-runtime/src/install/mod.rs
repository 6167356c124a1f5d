//! Program and model installation.
//!
//! [`InstallationOrchestrator`] owns the install gate and drives the
//! download workers; adapters plug in through [`InstallView`] and
//! [`InstallPrompt`].

mod error;
mod orchestrator;
mod prompt;
mod view;

pub use error::{InstallError, InstallResult};
pub use orchestrator::{InstallLayout, InstallPorts, InstallationOrchestrator, ModelInstallOutcome};
pub use prompt::{FixedAnswerPrompt, InstallPrompt, NonInteractivePrompt};
pub use view::{InstallView, ModelChoices, NoopView};

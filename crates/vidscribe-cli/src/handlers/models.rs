//! Model list/install/select handlers.

use std::sync::Arc;

use vidscribe_core::{MODELS, ModelId, ReadinessError, probe_model};
use vidscribe_runtime::{FixedAnswerPrompt, InstallPrompt, ModelInstallOutcome};

use super::cancel_on_ctrl_c;
use crate::bootstrap::CliContext;
use crate::commands::ModelsCommand;
use crate::error::CliError;
use crate::presentation::{CliInstallView, installed_mark, print_separator};
use crate::utils::CliPrompt;

pub async fn execute(ctx: &mut CliContext, command: ModelsCommand) -> Result<(), CliError> {
    match command {
        ModelsCommand::List => {
            list(ctx);
            Ok(())
        }
        ModelsCommand::Install { model, yes, keep } => install(ctx, model, prompt_for(yes, keep)).await,
        ModelsCommand::Select { model } => select(ctx, model),
    }
}

fn prompt_for(yes: bool, keep: bool) -> Arc<dyn InstallPrompt> {
    if yes {
        Arc::new(FixedAnswerPrompt::always_yes())
    } else if keep {
        Arc::new(FixedAnswerPrompt::always_no())
    } else {
        Arc::new(CliPrompt)
    }
}

fn list(ctx: &CliContext) {
    let selected = ctx.settings.faster_whisper_model;
    println!("{:<4} {:<16} {:<16} {:>8}", "", "ID", "NAME", "SIZE");
    print_separator(48);
    for model in &MODELS {
        let mark = if selected == Some(model.id) {
            "*"
        } else {
            installed_mark(probe_model(&ctx.paths.models_dir, model.dir_name))
        };
        println!("{:<4} {:<16} {:<16} {:>8}", mark, model.id, model.label, model.size);
    }
    println!("\n✓ installed, * selected. Models are stored in {}", ctx.paths.models_dir.display());
}

async fn install(ctx: &mut CliContext, model: ModelId, prompt: Arc<dyn InstallPrompt>) -> Result<(), CliError> {
    let entry = model.model();
    println!("Downloading {} ({}) into {}", entry.label, entry.size, ctx.paths.models_dir.display());

    let orchestrator = Arc::new(ctx.install_orchestrator(Arc::new(CliInstallView::new()), prompt)?);
    let interrupt = cancel_on_ctrl_c({
        let orchestrator = Arc::clone(&orchestrator);
        move || orchestrator.cancel_all()
    });
    let result = orchestrator.start_model_install(model).await;
    interrupt.abort();

    match result? {
        ModelInstallOutcome::Downloaded(dir) => println!("Model files saved to {}", dir.display()),
        ModelInstallOutcome::KeptExisting => println!("Kept the existing {} files", entry.label),
    }

    let selected = orchestrator.selected_model();
    if selected != ctx.settings.faster_whisper_model {
        ctx.settings.faster_whisper_model = selected;
        ctx.save()?;
    }
    Ok(())
}

fn select(ctx: &mut CliContext, model: ModelId) -> Result<(), CliError> {
    if !probe_model(&ctx.paths.models_dir, model.model().dir_name) {
        return Err(ReadinessError::ModelMissing(model).into());
    }
    ctx.settings.faster_whisper_model = Some(model);
    ctx.save()?;
    println!("✓ Selected model: {model}");
    Ok(())
}

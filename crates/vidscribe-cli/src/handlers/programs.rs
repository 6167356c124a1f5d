//! Program list/install handlers.

use std::sync::Arc;

use vidscribe_core::{PROGRAMS, ProgramId, probe_program};
use vidscribe_runtime::NonInteractivePrompt;

use super::cancel_on_ctrl_c;
use crate::bootstrap::CliContext;
use crate::commands::ProgramsCommand;
use crate::error::CliError;
use crate::presentation::{CliInstallView, installed_mark, print_separator};

pub async fn execute(ctx: &CliContext, command: ProgramsCommand) -> Result<(), CliError> {
    match command {
        ProgramsCommand::List => {
            list(ctx);
            Ok(())
        }
        ProgramsCommand::Install { program } => install(ctx, program).await,
    }
}

fn list(ctx: &CliContext) {
    let probe = probe_program(&ctx.paths.bin_dir);
    println!("{:<4} {:<4} {:<28} {:>10}", "", "ID", "BUILD", "SIZE");
    print_separator(50);
    for program in &PROGRAMS {
        println!(
            "{:<4} {:<4} {:<28} {:>10}",
            installed_mark(probe.kinds.contains(&program.kind)),
            program.id,
            program.label,
            program.size
        );
    }
}

async fn install(ctx: &CliContext, program: ProgramId) -> Result<(), CliError> {
    let entry = program.program();
    println!("Installing {} into {}", entry.display_label(), ctx.paths.bin_dir.display());

    let orchestrator = Arc::new(ctx.install_orchestrator(
        Arc::new(CliInstallView::new()),
        Arc::new(NonInteractivePrompt),
    )?);
    let interrupt = cancel_on_ctrl_c({
        let orchestrator = Arc::clone(&orchestrator);
        move || orchestrator.cancel_all()
    });
    let result = orchestrator.start_program_install(program).await;
    interrupt.abort();

    let path = result?;
    println!("Installed at {}", path.display());
    Ok(())
}

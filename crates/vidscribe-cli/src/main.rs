//! CLI entry point.
//!
//! Parses arguments, wires the context through [`bootstrap`] and hands
//! each command to its handler. Errors become sysexits-style exit codes.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use vidscribe_cli::handlers::video::VideoArgs;
use vidscribe_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands, config: &CliConfig) -> Result<(), CliError> {
    let mut ctx = bootstrap(config)?;

    match command {
        Commands::Paths => handlers::paths::execute(&ctx),
        Commands::Status => handlers::status::execute(&ctx),
        Commands::Programs { command } => handlers::programs::execute(&ctx, command).await?,
        Commands::Models { command } => handlers::models::execute(&mut ctx, command).await?,
        Commands::Video {
            url,
            work_dir,
            resolution,
            subtitles,
            thumbnail,
        } => {
            let args = VideoArgs {
                url,
                work_dir,
                resolution,
                subtitles,
                thumbnail,
            };
            handlers::video::execute(&ctx, args).await?;
        }
        Commands::Config { command } => handlers::config::execute(&mut ctx, command)?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = CliConfig {
        models_dir: cli.models_dir,
    };
    if let Err(e) = run(command, &config).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
    Ok(())
}

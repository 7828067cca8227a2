//! CLI entry point - the composition root.
//!
//! Command dispatch routes to handlers; all dependencies come from the
//! `CliContext` built by bootstrap.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use romdl_cli::handlers::get::GetArgs;
use romdl_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command.as_ref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(CliConfig::from_cli(&cli)?)?;

    match command {
        Commands::Platforms => handlers::platforms::execute(&ctx)?,
        Commands::List { platform, filter } => {
            handlers::list::execute(&ctx, platform, filter.as_deref()).await?;
        }
        Commands::Get {
            platform,
            filter,
            first,
        } => {
            let args = GetArgs {
                platform,
                filter,
                first: *first,
            };
            handlers::get::execute(&ctx, args).await?;
        }
        Commands::Resume => handlers::resume::execute(&ctx).await?,
        Commands::Queue => handlers::queue::execute(&ctx).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before reading RUST_LOG or ROMDL_* variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_directive());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

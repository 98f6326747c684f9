//! Tidemark CLI - apply, inspect, and repair SQL migrations

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{migrate, restore, status, unlock};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment and config file still apply.
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Restore => restore::execute(&cli.global).await,
        cli::Commands::Unlock => unlock::execute(&cli.global).await,
    }
}

/// `RUST_LOG` wins; otherwise info, or debug with `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

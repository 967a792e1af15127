//! Tidemark CLI - apply ordered SQL migrations exactly once and rebuild views

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;
mod reporter;

use cli::Cli;
use commands::{ensure, migrate, new, status};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.global.verbose);

    match &cli.command {
        cli::Commands::Migrate => migrate::execute(&cli.global).await,
        cli::Commands::Ensure => ensure::execute(&cli.global).await,
        cli::Commands::Status => status::execute(&cli.global).await,
        cli::Commands::New(args) => new::execute(args, &cli.global),
    }
}

/// `RUST_LOG` wins over `--verbose`.
fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

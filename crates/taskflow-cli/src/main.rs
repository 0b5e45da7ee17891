mod cli;
mod context;
mod handlers;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use context::CliContext;
use tracing_subscriber::EnvFilter;

fn init_tracing() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TASKFLOW_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(log_file)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        // stdout carries the JSON responses
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("warn"))
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let file_path = cli
        .file
        .ok_or_else(|| anyhow::anyhow!("--file or TASKFLOW_FILE is required"))?;
    tracing::debug!("Using task file {}", file_path);
    let ctx = CliContext::new(&file_path, cli.now.as_deref())?;

    match cli.command {
        Commands::List(args) => handlers::task::handle_list(&ctx, args).await?,
        Commands::Board(args) => handlers::board::handle(&ctx, args).await?,
        Commands::Move {
            id,
            status,
            no_rollback,
        } => handlers::task::handle_move(&ctx, id, status, no_rollback).await?,
    }

    Ok(())
}

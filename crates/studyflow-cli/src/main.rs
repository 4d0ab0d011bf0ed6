mod cli;
mod commands;
mod config;
mod error;
mod output;
mod setup;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use studyflow_core::paths;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::CliConfig::load();

    // Logs go to a daily file so command output stays clean.
    let log_dir = paths::logs_dir()?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "studyflow.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    let result = commands::run(cli, config).await;
    // Flush buffered log lines before a possible exit.
    drop(guard);

    if let Err(err) = result {
        error::handle_error(err);
    }
    Ok(())
}

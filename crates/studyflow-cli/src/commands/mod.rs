pub mod account;
pub mod request;
pub mod session;

use anyhow::Result;
use colored::Colorize;
use studyflow_core::auth::SessionEvent;
use tokio::sync::broadcast;
use tracing::warn;

use crate::cli::{Cli, Commands};
use crate::config::CliConfig;
use crate::setup::prepare_core;

pub async fn run(cli: Cli, config: CliConfig) -> Result<()> {
    let client_config = config.client_config(cli.api_url.as_deref());
    let db_path = cli.db_path.or(config.default.db_path);
    let core = prepare_core(db_path, client_config)?;
    let format = cli.format;

    match cli.command {
        Commands::Login { email, password } => session::login(&core, &email, password, format).await,
        Commands::Logout => session::logout(&core, format),
        Commands::Status => session::status(&core, format),
        Commands::Health => session::health(&core, format).await,
        Commands::Request(args) => request::run(&core, args, format).await,
        Commands::Account { command } => account::run(&core, command, format),
    }
}

/// Print session notifications raised while a command ran.
pub(crate) fn report_session_events(events: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::Expired {
                redirect_to,
                reason,
            } => {
                warn!(%reason, %redirect_to, "Session expired during command");
                eprintln!("{} {}", "Session expired:".yellow().bold(), reason);
                eprintln!("  Stored credentials were cleared (sign-in entry point: {redirect_to})");
            }
            SessionEvent::SignedOut => {}
        }
    }
}

pub(crate) fn read_password(provided: Option<String>, prompt: &str) -> Result<String> {
    match provided {
        Some(password) => Ok(password),
        None => Ok(rpassword::prompt_password(prompt)?),
    }
}

/// Password plus confirmation. A provided password confirms itself.
pub(crate) fn read_new_password(provided: Option<String>) -> Result<(String, String)> {
    match provided {
        Some(password) => Ok((password.clone(), password)),
        None => {
            let password = rpassword::prompt_password("Password: ")?;
            let confirm = rpassword::prompt_password("Confirm password: ")?;
            Ok((password, confirm))
        }
    }
}

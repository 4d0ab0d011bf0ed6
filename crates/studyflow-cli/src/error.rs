use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err);

    let msg = format!("{err:#}").to_lowercase();

    if msg.contains("authentication required")
        || msg.contains("session expired")
        || msg.contains("no refresh token")
        || msg.contains("renewal rejected")
    {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Sign in again with:");
        eprintln!("  {} studyflow login <email>", "$".dimmed());
    }

    if msg.contains("no user is signed in") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Sign in to a local account with:");
        eprintln!("  {} studyflow account login <email>", "$".dimmed());
    }

    if msg.contains("connection refused") || msg.contains("timed out") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Check that the API server is running:");
        eprintln!("  {} studyflow health", "$".dimmed());
    }

    std::process::exit(1);
}

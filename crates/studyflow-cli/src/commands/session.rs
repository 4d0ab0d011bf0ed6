use anyhow::Result;
use serde_json::json;
use studyflow_core::AppCore;
use tracing::info;

use super::{read_password, report_session_events};
use crate::output::table::{field_table, print_table};
use crate::output::{OutputFormat, json::print_json};

pub async fn login(
    core: &AppCore,
    email: &str,
    password: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let password = read_password(password, "Password: ")?;
    core.api.sign_in(email, &password).await?;
    info!(email, "CLI sign-in succeeded");

    if format.is_json() {
        return print_json(&json!({ "signed_in": true, "email": email }));
    }

    println!("Signed in as {email}");
    Ok(())
}

pub fn logout(core: &AppCore, format: OutputFormat) -> Result<()> {
    let mut events = core.session.subscribe();
    core.sign_out()?;
    report_session_events(&mut events);
    info!("CLI sign-out completed");

    if format.is_json() {
        return print_json(&json!({ "signed_in": false }));
    }

    println!("Signed out");
    Ok(())
}

pub fn status(core: &AppCore, format: OutputFormat) -> Result<()> {
    let credentials = core.session.credentials();
    let signed_in = credentials.access_token()?.is_some();
    let renewable = credentials.refresh_token()?.is_some();
    let user = core.accounts.current_user()?;
    let config = core.api.config();

    if format.is_json() {
        return print_json(&json!({
            "signed_in": signed_in,
            "renewable": renewable,
            "local_user": user.as_ref().map(|u| &u.email),
            "base_url": config.base_url,
            "timeout_seconds": config.timeout_seconds,
        }));
    }

    let yes_no = |flag: bool| (if flag { "yes" } else { "no" }).to_string();
    print_table(field_table([
        ("Signed in", yes_no(signed_in)),
        ("Refresh token", yes_no(renewable)),
        (
            "Local user",
            user.map(|u| u.email).unwrap_or_else(|| "-".to_string()),
        ),
        ("API", config.base_url.clone()),
        ("Timeout", format!("{}s", config.timeout_seconds)),
    ]))
}

pub async fn health(core: &AppCore, format: OutputFormat) -> Result<()> {
    let health = core.api.health().await?;

    if format.is_json() {
        return print_json(&health);
    }

    let status = health
        .get("status")
        .and_then(|s| s.as_str())
        .unwrap_or("unknown");
    println!("API server: {status} ({})", core.api.config().root_url);
    Ok(())
}

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;
use studyflow_core::AppCore;
use studyflow_core::auth::{NewAccount, ProfileUpdate, User};
use tracing::info;

use super::{read_new_password, read_password};
use crate::cli::{AccountCommands, UpdateArgs};
use crate::output::table::{field_table, print_table};
use crate::output::{OutputFormat, json::print_json};

/// Account fields safe to print.
#[derive(Serialize)]
struct AccountView<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    created_at: String,
}

impl<'a> From<&'a User> for AccountView<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: &user.id,
            name: &user.name,
            email: &user.email,
            phone: user.phone.as_deref(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

pub fn run(core: &AppCore, command: AccountCommands, format: OutputFormat) -> Result<()> {
    match command {
        AccountCommands::Register {
            first_name,
            last_name,
            email,
            phone,
            password,
        } => {
            let (password, confirm_password) = read_new_password(password)?;
            let user = core.accounts.register(NewAccount {
                first_name,
                last_name,
                email,
                phone,
                password,
                confirm_password,
            })?;
            info!(user_id = %user.id, "Registered local account from CLI");
            print_account(&user, "Registered", format)
        }
        AccountCommands::Login { email, password } => {
            let password = read_password(password, "Password: ")?;
            let user = core.accounts.sign_in(&email, &password)?;
            print_account(&user, "Signed in", format)
        }
        AccountCommands::Show => {
            let Some(user) = core.accounts.current_user()? else {
                anyhow::bail!("No user is signed in");
            };
            print_account(&user, "Signed in", format)
        }
        AccountCommands::List => list(core, format),
        AccountCommands::Update(args) => update(core, args, format),
    }
}

fn list(core: &AppCore, format: OutputFormat) -> Result<()> {
    let users = core.accounts.list_users()?;

    if format.is_json() {
        let views: Vec<AccountView> = users.iter().map(AccountView::from).collect();
        return print_json(&views);
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Email", "Created"]);
    for user in &users {
        table.add_row(vec![
            Cell::new(&user.name),
            Cell::new(&user.email),
            Cell::new(user.created_at.format("%Y-%m-%d")),
        ]);
    }
    print_table(table)
}

fn update(core: &AppCore, args: UpdateArgs, format: OutputFormat) -> Result<()> {
    let (password, confirm_password) = match (args.new_password, args.change_password) {
        (Some(password), _) => (Some(password.clone()), Some(password)),
        (None, true) => {
            let (password, confirm) = read_new_password(None)?;
            (Some(password), Some(confirm))
        }
        (None, false) => (None, None),
    };

    let user = core.accounts.update_profile(ProfileUpdate {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
        password,
        confirm_password,
    })?;
    print_account(&user, "Updated", format)
}

fn print_account(user: &User, heading: &str, format: OutputFormat) -> Result<()> {
    if format.is_json() {
        return print_json(&AccountView::from(user));
    }

    println!("{heading}: {}", user.email);
    print_table(field_table([
        ("Name", user.name.clone()),
        ("Email", user.email.clone()),
        ("Phone", user.phone.clone().unwrap_or_else(|| "-".to_string())),
        ("Created", user.created_at.to_rfc3339()),
    ]))
}

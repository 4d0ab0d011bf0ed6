use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "studyflow")]
#[command(version, about = "StudyFlow - study planner client")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (defaults to ~/.studyflow/studyflow.db)
    #[arg(long, global = true, env = "STUDYFLOW_DB_PATH")]
    pub db_path: Option<String>,

    /// API base URL, e.g. http://localhost:3000/api
    #[arg(long, global = true, env = "STUDYFLOW_API_URL")]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in to the StudyFlow API
    Login {
        /// Account email
        email: String,

        /// Password (prompted when omitted)
        #[arg(long, env = "STUDYFLOW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and drop stored credentials
    Logout,

    /// Show session status
    Status,

    /// Check that the API server is reachable
    Health,

    /// Send an authenticated API request
    Request(RequestArgs),

    /// Local account management
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
}

#[derive(Args)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,

    /// Path relative to the API base URL, e.g. /projects
    pub path: String,

    /// JSON request body
    #[arg(long)]
    pub data: Option<String>,

    /// Query parameter as key=value (repeatable)
    #[arg(long = "query", short = 'q')]
    pub query: Vec<String>,
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Register a local account
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: Option<String>,

        /// Password (prompted twice when omitted)
        #[arg(long, env = "STUDYFLOW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign in to a local account
    Login {
        email: String,

        #[arg(long, env = "STUDYFLOW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Show the signed-in account
    Show,

    /// List registered accounts
    List,

    /// Update the signed-in account
    Update(UpdateArgs),
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// New password
    #[arg(long, env = "STUDYFLOW_NEW_PASSWORD", hide_env_values = true)]
    pub new_password: Option<String>,

    /// Prompt for a new password
    #[arg(long, conflicts_with = "new_password")]
    pub change_password: bool,
}

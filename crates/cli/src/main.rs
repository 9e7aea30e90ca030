//! `civic`: command-line client for the civic complaints platform.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use civic_core::complaint::{Category, ComplaintStatus, FeedSort};
use civic_core::types::DbId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod context;
mod output;

use context::Context;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "civic=info,civic_client=info,civic_session=info";

#[derive(Parser)]
#[command(name = "civic")]
#[command(author, version, about = "Report, track, and triage civic complaints", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Backend base URL (overrides CIVIC_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Token file (overrides CIVIC_TOKEN_FILE)
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    // -------------------------------------------------------------------------
    // Account
    // -------------------------------------------------------------------------
    /// Sign in with a username and password, or print the Google sign-in URL
    Login {
        #[arg(long, required_unless_present = "google")]
        username: Option<String>,

        #[arg(long, env = "CIVIC_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Print the Google sign-in URL instead
        #[arg(long, conflicts_with = "username")]
        google: bool,
    },

    /// Finish a Google sign-in with the tokens from the callback URL
    AdoptTokens {
        #[arg(long)]
        access: String,
        #[arg(long)]
        refresh: String,
    },

    /// Create an account and sign in
    Register {
        #[arg(long)]
        username: String,
        /// Contact email (optional)
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, env = "CIVIC_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// Sign out and forget stored tokens
    Logout,

    /// Show the signed-in user
    Whoami,

    // -------------------------------------------------------------------------
    // Complaints
    // -------------------------------------------------------------------------
    /// Look up a complaint by its identifier, e.g. HA-2025-001
    Track { code: String },

    /// Browse the public complaint feed
    Feed {
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, value_parser = parse_status)]
        status: Option<ComplaintStatus>,
        #[arg(long, value_parser = parse_sort)]
        sort: Option<FeedSort>,
    },

    /// Show one complaint by numeric id
    Show { id: DbId },

    /// Toggle your upvote on a complaint
    Upvote { id: DbId },

    /// Report a new issue
    Submit {
        #[arg(long, value_parser = parse_category)]
        category: Category,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        location: String,
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Image to attach; repeat for several
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },

    // -------------------------------------------------------------------------
    // Administration
    // -------------------------------------------------------------------------
    /// List all complaints (administrators)
    Complaints,

    /// Change a complaint's status (administrators)
    SetStatus {
        id: DbId,
        #[arg(value_parser = parse_status)]
        status: ComplaintStatus,
    },

    /// Assign a complaint to a department and/or officer (administrators)
    Assign {
        id: DbId,
        #[arg(long, conflicts_with = "clear_department")]
        department: Option<DbId>,
        #[arg(long)]
        clear_department: bool,
        #[arg(long, conflicts_with = "clear_officer")]
        officer: Option<DbId>,
        #[arg(long)]
        clear_officer: bool,
    },

    /// List departments
    Departments,

    /// List the officers of a department (administrators)
    Officers { department_id: DbId },
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::from_name(raw).map_err(|e| e.to_string())
}

fn parse_status(raw: &str) -> Result<ComplaintStatus, String> {
    ComplaintStatus::from_name(raw).map_err(|e| e.to_string())
}

fn parse_sort(raw: &str) -> Result<FeedSort, String> {
    FeedSort::from_name(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = Context::build(&cli.global).await?;
    commands::run(cli.command, &ctx).await
}

//! `ReadyWall` admin console
//!
//! Terminal front end for the `ReadyWall` admin dashboard: one subcommand
//! group per dashboard screen, all talking to a single configured gateway.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::future_not_send)]

mod console;
mod drafts;
mod output;
mod screens;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::Console;
use readywall_client::{ListQuery, Route};
use readywall_core::Config;
use std::path::PathBuf;
use tracing::debug;

/// Command line interface for the `ReadyWall` admin console
#[derive(Parser)]
#[command(
    name = "readywall-admin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Admin console for the ReadyWall backend",
    long_about = "Manage leads, products, blogs, customer messages and users of the ReadyWall construction-materials backend from the terminal."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the configuration
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        /// Admin email
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long, env = "READYWALL_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in admin
    Whoami,

    /// Record totals and recent leads
    Dashboard,

    /// Sales leads
    Leads {
        /// Lead action
        #[command(subcommand)]
        action: RecordCommand,
    },

    /// Product catalogue
    Products {
        /// Product action
        #[command(subcommand)]
        action: RecordCommand,
    },

    /// Blog posts
    Blogs {
        /// Blog action
        #[command(subcommand)]
        action: RecordCommand,
    },

    /// Customer inquiries
    Inquiries {
        /// Inquiry action
        #[command(subcommand)]
        action: InquiryCommand,
    },

    /// Registered users
    Users {
        /// User action
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Print the resolved configuration as TOML
    Config,
}

impl Commands {
    /// Screen a command belongs to; `None` for commands that need no session
    const fn route(&self) -> Option<Route> {
        match self {
            Self::Login { .. } | Self::Config => None,
            Self::Logout | Self::Whoami | Self::Dashboard => Some(Route::Dashboard),
            Self::Leads { .. } => Some(Route::Leads),
            Self::Products { .. } => Some(Route::Products),
            Self::Blogs { .. } => Some(Route::Blogs),
            Self::Inquiries { .. } => Some(Route::Messages),
            Self::Users { .. } => Some(Route::Users),
        }
    }
}

/// List filtering and paging
#[derive(Args, Debug, Clone, Default)]
struct ListArgs {
    /// Case-insensitive text search over the screen's search fields
    #[arg(short, long)]
    search: Option<String>,

    /// Exact status or category value; "all" shows everything
    #[arg(short, long)]
    filter: Option<String>,

    /// Page to request
    #[arg(long)]
    page: Option<u32>,

    /// Page size to request
    #[arg(long)]
    limit: Option<u32>,
}

impl ListArgs {
    /// Paging goes to the server; search and filter stay local
    const fn query(&self) -> ListQuery {
        ListQuery {
            search: None,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Form input for create and update
#[derive(Args, Debug, Clone)]
struct DraftArgs {
    /// JSON file with the form fields, as strings
    #[arg(long, value_name = "FILE")]
    draft: PathBuf,

    /// Image to upload; repeat for several
    #[arg(long = "image", value_name = "FILE")]
    images: Vec<PathBuf>,
}

/// Actions shared by the record screens
#[derive(Subcommand, Debug, Clone)]
enum RecordCommand {
    /// List records
    List(ListArgs),

    /// Show one record
    Show {
        /// Record id
        id: String,

        /// Gallery position to display; wraps in both directions
        #[arg(long, value_name = "N", allow_hyphen_values = true)]
        image: Option<i64>,
    },

    /// Create a record from a draft file
    Create(DraftArgs),

    /// Update a record; the draft file only needs the changed fields
    Update {
        /// Record id
        id: String,

        /// Form input
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Delete a record
    Delete {
        /// Record id
        id: String,

        /// Confirm the delete; without it nothing is sent
        #[arg(long)]
        yes: bool,
    },
}

/// Inquiry actions
#[derive(Subcommand, Debug, Clone)]
enum InquiryCommand {
    /// Shared record actions
    #[command(flatten)]
    Record(RecordCommand),

    /// Move an inquiry to another status
    Status {
        /// Inquiry id
        id: String,

        /// New status (new, contacted, closed)
        status: String,
    },
}

/// User actions
#[derive(Subcommand, Debug, Clone)]
enum UserCommand {
    /// List users
    List(ListArgs),

    /// Allow a user to sign in
    Activate {
        /// User id
        id: String,
    },

    /// Block a user from signing in
    Deactivate {
        /// User id
        id: String,
    },

    /// Flip a user between active and inactive
    Toggle {
        /// User id
        id: String,
    },
}

/// Main entry point for the admin console
///
/// # Errors
///
/// Returns error if configuration, the session, or the gateway call fails
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    readywall_core::init_logging(&config.logging)?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        gateway = config.gateway.base_url(),
        "readywall-admin starting"
    );

    let mut console = Console::new(config, cli.json)?;
    let route = cli.command.route();
    let result = console.run(route, cli.command).await;
    console.flush_notices();
    result
}

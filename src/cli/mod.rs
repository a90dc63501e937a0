//! CLI module for Lexis
//!
//! Provides command-line interface parsing and handling for the lexis binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod commands;
pub mod init;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use lexis::{AssignmentAction, Plan, Role};
use std::path::PathBuf;

/// Lexis - legal document analysis from the terminal
///
/// Upload contracts, run risk analysis, read reports and collaborate with
/// your lawyer. Your session is kept alive across runs; expired access
/// tokens are refreshed automatically.
#[derive(Parser, Debug)]
#[command(
    name = "lexis",
    author = "Lexis <build@lexis.dev>",
    version,
    about = "Lexis - legal document analysis client",
    after_help = "EXAMPLES:\n    \
                  lexis init                          # Write a lexis.toml\n    \
                  lexis login --email ana@example.com # Sign in\n    \
                  lexis documents upload nda.pdf      # Upload a contract\n    \
                  lexis documents report 12           # Show the risk report\n    \
                  lexis mock-server                   # Run a local backend"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "lexis.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a lexis.toml in a directory
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// API base URL to write into the config
        #[arg(long, default_value = "http://127.0.0.1:8000/api/")]
        base_url: String,

        /// Keep credentials in memory only
        #[arg(long)]
        memory: bool,
    },

    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        /// Password; read from stdin when omitted
        #[arg(short, long, env = "LEXIS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        /// Password; read from stdin when omitted
        #[arg(short, long, env = "LEXIS_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        #[arg(long, value_enum, default_value = "individual")]
        role: RoleArg,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Re-fetch the profile from the server
        #[arg(long)]
        refresh: bool,
    },

    /// Role-specific overview
    Dashboard,

    /// Upload, analyze and download documents
    #[command(subcommand)]
    Documents(DocumentCommands),

    /// Comments on a document
    #[command(subcommand)]
    Comments(CommentCommands),

    /// Version history of a document
    #[command(subcommand)]
    Versions(VersionCommands),

    /// In-app notifications
    #[command(subcommand)]
    Notifications(NotificationCommands),

    /// Recent account activity
    Activity {
        /// Only entries of this log type
        #[arg(long = "type")]
        kind: Option<String>,
    },

    /// Share documents between lawyer and client
    #[command(subcommand)]
    Share(ShareCommands),

    /// Lawyer/client assignments
    #[command(subcommand)]
    Clients(ClientCommands),

    /// Plan, usage and billing
    #[command(subcommand)]
    Subscription(SubscriptionCommands),

    /// Run the in-memory development backend
    #[cfg(feature = "mock-server")]
    MockServer {
        /// Host to bind (defaults to [mock] host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (defaults to [mock] port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocumentCommands {
    /// List your documents
    List,

    /// Show one document
    Show { id: i64 },

    /// Upload a file
    Upload {
        file: PathBuf,

        /// Display title (defaults to the file name on the server)
        #[arg(short, long)]
        title: Option<String>,

        /// Run analysis right after the upload
        #[arg(long)]
        analyze: bool,
    },

    /// Run risk analysis
    Analyze { id: i64 },

    /// Show the analysis report
    Report { id: i64 },

    /// Save the original file
    Download {
        id: i64,

        /// Destination path (defaults to document_<id>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// Comments on a document
    List { document: i64 },

    /// Add a comment
    Add { document: i64, text: String },

    /// Delete a comment
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum VersionCommands {
    /// Versions of a document
    List { document: i64 },

    /// Show one version
    Show { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum NotificationCommands {
    /// List notifications
    List {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark one notification as read
    Read { id: i64 },

    /// Mark every notification as read
    ReadAll,

    /// Delete a notification
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ShareCommands {
    /// Share a document with a client
    Create {
        #[arg(long)]
        document: i64,

        #[arg(long)]
        client: i64,
    },

    /// Accept a share
    Accept { id: i64 },

    /// Decline a share
    Decline { id: i64 },

    /// Documents shared with you, or by you with --sent
    List {
        #[arg(long)]
        sent: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// Invite a client by email
    Assign { email: String },

    /// Your clients
    List,

    /// Accept or reject an assignment request
    Respond {
        id: i64,

        #[arg(value_enum)]
        action: ActionArg,
    },

    /// Pending requests, or the ones you sent with --sent
    Requests {
        #[arg(long)]
        sent: bool,
    },

    /// Search users
    Search { query: String },
}

#[derive(Subcommand, Debug)]
pub enum SubscriptionCommands {
    /// Current plan and usage
    Status,

    /// Start a checkout for a plan
    Checkout {
        #[arg(value_enum, default_value = "premium")]
        plan: PlanArg,
    },

    /// Open the billing portal
    Portal,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RoleArg {
    Individual,
    Lawyer,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Individual => Role::Individual,
            RoleArg::Lawyer => Role::Lawyer,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ActionArg {
    Accept,
    Reject,
}

impl From<ActionArg> for AssignmentAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Accept => AssignmentAction::Accept,
            ActionArg::Reject => AssignmentAction::Reject,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PlanArg {
    Free,
    Premium,
}

impl From<PlanArg> for Plan {
    fn from(arg: PlanArg) -> Self {
        match arg {
            PlanArg::Free => Plan::Free,
            PlanArg::Premium => Plan::Premium,
        }
    }
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

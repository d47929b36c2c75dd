//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    // Format: "0.1.0 (abc1234, 2026-01-29)"
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Akwaaba Tickets - event ticketing server and operator tools
#[derive(Parser, Debug)]
#[command(name = "akwaaba")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to data directory
    #[arg(short, long, env = "AKWAABA_DATA_DIR", global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, env = "AKWAABA_HOST")]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long, env = "AKWAABA_PORT")]
        port: Option<u16>,
    },

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List all accounts
    List {
        /// Output format (table, json, brief)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Disable an account and end its sessions
    Disable {
        /// User ID, email or phone number
        #[arg(required = true)]
        identifier: String,
    },

    /// Re-enable a disabled account
    Enable {
        /// User ID, email or phone number
        #[arg(required = true)]
        identifier: String,
    },
}

/// Output format for list commands
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Brief,
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

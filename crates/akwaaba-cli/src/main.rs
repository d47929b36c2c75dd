//! Akwaaba CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use akwaaba_cli::cli::Cli;
use akwaaba_cli::commands;

fn main() {
    // Load .env if it exists (AKWAABA_DATA_DIR, AKWAABA_PORT etc.)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = commands::execute(cli.command, cli.data_dir.as_deref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

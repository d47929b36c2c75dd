//! Command handlers for CLI subcommands.

use akwaaba_api::{ApiConfig, AppState};
use akwaaba_core::config::{data_dir, expand_path};
use akwaaba_core::{AppConfig, Services};
use akwaaba_models::{AccountStatus, User};
use serde::Serialize;
use tracing::info;

use crate::cli::{Commands, OutputFormat, UsersCommand};

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command.
pub fn execute(command: Commands, data_dir_flag: Option<&str>) -> Result<()> {
    let config = app_config(data_dir_flag);

    match command {
        Commands::Serve { host, port } => cmd_serve(config, host, port),
        Commands::Users { command } => {
            let services = Services::open(config)?;
            match command {
                UsersCommand::List { format } => cmd_users_list(&services, format),
                UsersCommand::Disable { identifier } => {
                    cmd_set_status(&services, &identifier, AccountStatus::Disabled)
                }
                UsersCommand::Enable { identifier } => {
                    cmd_set_status(&services, &identifier, AccountStatus::Active)
                }
            }
        }
    }
}

/// Application config with the `--data-dir` flag applied over the environment.
fn app_config(data_dir_flag: Option<&str>) -> AppConfig {
    let dir = data_dir_flag
        .filter(|d| !d.trim().is_empty())
        .map(expand_path)
        .unwrap_or_else(data_dir);
    let defaults = AppConfig::from_env();
    AppConfig::new(dir).with_session_ttl(defaults.session_ttl)
}

fn cmd_serve(config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    info!(data_dir = %config.data_dir.display(), "Opening data directory");
    let services = Services::open(config)?;

    let mut api_config = ApiConfig::from_env();
    if let Some(host) = host {
        api_config.host = host;
    }
    if let Some(port) = port {
        api_config.port = port;
    }

    println!("Akwaaba Tickets listening on http://{}", api_config.bind_address());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(akwaaba_api::serve(AppState::new(api_config, services)))?;
    Ok(())
}

/// A user row for listings; leaves out the password hash.
#[derive(Debug, Serialize)]
struct UserRow<'a> {
    id: String,
    role: &'a str,
    full_name: &'a str,
    email: &'a str,
    phone: &'a str,
    status: AccountStatus,
    created_at: String,
}

impl<'a> From<&'a User> for UserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: user.id.to_string(),
            role: user.role.as_str(),
            full_name: &user.full_name,
            email: &user.email,
            phone: &user.phone,
            status: user.status,
            created_at: user.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn cmd_users_list(services: &Services, format: OutputFormat) -> Result<()> {
    let users = services.accounts.list()?;
    println!("{}", render_users(&users, format)?);
    Ok(())
}

fn render_users(users: &[User], format: OutputFormat) -> Result<String> {
    let rows: Vec<UserRow<'_>> = users.iter().map(UserRow::from).collect();
    let mut out = String::new();

    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                return Ok("No users found.".to_string());
            }

            out.push_str(&format!(
                "{:<24}  {:<9}  {:<20}  {:<28}  {:<8}  CREATED\n",
                "ID", "ROLE", "NAME", "EMAIL", "STATUS"
            ));
            out.push_str(&"-".repeat(110));
            out.push('\n');
            for row in &rows {
                out.push_str(&format!(
                    "{:<24}  {:<9}  {:<20}  {:<28}  {:<8}  {}\n",
                    row.id,
                    row.role,
                    truncate(row.full_name, 20),
                    truncate(row.email, 28),
                    status_label(row.status),
                    row.created_at
                ));
            }
            out.push_str(&format!("\n{} user(s)", rows.len()));
        }
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(&rows)?;
        }
        OutputFormat::Brief => {
            let lines: Vec<String> = rows
                .iter()
                .map(|row| format!("{}\t{}", row.id, row.email))
                .collect();
            out = lines.join("\n");
        }
    }

    Ok(out)
}

fn cmd_set_status(services: &Services, identifier: &str, status: AccountStatus) -> Result<()> {
    let user = services.accounts.set_status(identifier, status)?;
    println!(
        "{} {} ({})",
        match status {
            AccountStatus::Active => "Enabled",
            AccountStatus::Disabled => "Disabled",
        },
        user.email,
        user.id
    );
    Ok(())
}

fn status_label(status: AccountStatus) -> &'static str {
    match status {
        AccountStatus::Active => "active",
        AccountStatus::Disabled => "disabled",
    }
}

/// Truncates a string to the given character count, adding "..." if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

//! Application configuration.
//!
//! Locates the data directory and session lifetime. Resolution order is
//! explicit value (CLI flag), then environment, then default.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.akwaaba/
//! ├── users/
//! ├── events/
//! ├── tickets/
//! ├── transactions/
//! └── subscriptions.json
//! ```
//!
//! # Environment Variables
//!
//! - `AKWAABA_DATA_DIR`: Override the data directory
//! - `AKWAABA_SESSION_TTL_HOURS`: Session lifetime in hours

use std::path::PathBuf;

use chrono::Duration;

/// Environment variable for a custom data directory.
pub const DATA_DIR_ENV: &str = "AKWAABA_DATA_DIR";

/// Environment variable for the session lifetime in hours.
pub const SESSION_TTL_ENV: &str = "AKWAABA_SESSION_TTL_HOURS";

/// Default data directory name under home.
const DEFAULT_DATA_DIR: &str = ".akwaaba";

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

/// Runtime configuration for the application layer.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root of the document store.
    pub data_dir: PathBuf,
    /// How long a login session stays valid.
    pub session_ttl: Duration,
}

impl AppConfig {
    /// Creates a config for `data_dir` with the default session lifetime.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }

    /// Resolves everything from the environment.
    pub fn from_env() -> Self {
        Self {
            data_dir: data_dir(),
            session_ttl: session_ttl(),
        }
    }

    /// Sets the session lifetime.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Expands `~` and `$VARS` in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::full(raw).map(|s| s.into_owned()).unwrap_or_else(|_| raw.to_string()))
}

/// Get the data directory.
///
/// The data directory is determined by:
/// 1. `AKWAABA_DATA_DIR` environment variable if set
/// 2. `~/.akwaaba` if home directory is available
/// 3. `.akwaaba` in current directory as fallback
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| expand_path(&v))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_DATA_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
        })
}

/// Session lifetime from `AKWAABA_SESSION_TTL_HOURS`, default 12 hours.
pub fn session_ttl() -> Duration {
    let hours = std::env::var(SESSION_TTL_ENV)
        .ok()
        .and_then(|v| parse_ttl_hours(&v))
        .unwrap_or(DEFAULT_SESSION_TTL_HOURS);
    Duration::hours(hours)
}

fn parse_ttl_hours(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|h| *h > 0)
}

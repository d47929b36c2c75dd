//! API configuration.

use std::time::Instant;

/// Environment variable for the bind host.
pub const HOST_ENV: &str = "AKWAABA_HOST";

/// Environment variable for the bind port.
pub const PORT_ENV: &str = "AKWAABA_PORT";

/// Environment variable for allowed CORS origins (comma separated).
pub const CORS_ORIGINS_ENV: &str = "AKWAABA_CORS_ORIGINS";

/// Environment variable for the externally visible base URL.
pub const PUBLIC_URL_ENV: &str = "AKWAABA_PUBLIC_URL";

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8780;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Allowed CORS origins; `*` allows any.
    pub cors_origins: Vec<String>,
    /// Base URL used in links handed to third parties.
    pub public_url: Option<String>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl ApiConfig {
    /// Creates a new API configuration with the given host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            cors_origins: vec!["*".to_string()],
            public_url: None,
            start_time: Instant::now(),
        }
    }

    /// Reads host, port, CORS origins and public URL from the environment.
    pub fn from_env() -> Self {
        let host = std::env::var(HOST_ENV)
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = std::env::var(PORT_ENV)
            .ok()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let mut config = Self::new(host, port);
        if let Ok(raw) = std::env::var(CORS_ORIGINS_ENV) {
            let origins = parse_origins(&raw);
            if !origins.is_empty() {
                config.cors_origins = origins;
            }
        }
        config.public_url = std::env::var(PUBLIC_URL_ENV)
            .ok()
            .filter(|u| !u.trim().is_empty());
        config
    }

    /// Sets the CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Sets the public base URL.
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into());
        self
    }

    /// Returns the bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true when every origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    /// Absolute URL for `path` under the public base URL.
    pub fn public_link(&self, path: &str) -> String {
        let base = self
            .public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.bind_address()));
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    /// Returns the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

/// Splits a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_default() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8780);
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_api_config_bind_address() {
        let config = ApiConfig::new("0.0.0.0", 3000);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_api_config_with_cors() {
        let config = ApiConfig::default()
            .with_cors_origins(vec!["http://localhost:3000".to_string()]);
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" https://a.example , ,https://b.example"),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(parse_origins(" , ").is_empty());
    }

    #[test]
    fn test_public_link() {
        let config = ApiConfig::new("127.0.0.1", 9000);
        assert_eq!(
            config.public_link("/events/evt-1"),
            "http://127.0.0.1:9000/events/evt-1"
        );
        let config = config.with_public_url("https://tickets.example/");
        assert_eq!(
            config.public_link("/events/evt-1"),
            "https://tickets.example/events/evt-1"
        );
    }
}

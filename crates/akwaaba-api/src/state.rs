//! Application state shared across handlers.

use std::sync::Arc;

use akwaaba_core::Services;

use crate::config::ApiConfig;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Application services.
    pub services: Services,
}

impl AppState {
    /// Creates a new AppState over opened services.
    pub fn new(config: ApiConfig, services: Services) -> Self {
        Self {
            config: Arc::new(config),
            services,
        }
    }
}

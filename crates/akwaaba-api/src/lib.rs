//! HTTP JSON API for Akwaaba Tickets.
//!
//! This crate is the presentation layer; it holds no business rules:
//! - Accounts: signup, login/logout, profile and password
//! - Public catalog: browsing, event pages, calendar files, categories
//! - Checkout: quotes and purchases (attendees)
//! - Wallet and transaction history with CSV export (attendees)
//! - Event management, reports and ticket exports (organizers)
//! - Newsletter subscription
//!
//! Callers authenticate with `Authorization: Bearer <token>` from login.
//!
//! # Example
//!
//! ```ignore
//! use akwaaba_api::{ApiConfig, AppState, serve};
//! use akwaaba_core::{AppConfig, Services};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let services = Services::open(AppConfig::from_env())?;
//!     let state = AppState::new(ApiConfig::from_env(), services);
//!
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use router::{create_router, serve};
pub use state::AppState;

//! API request handlers.

pub mod auth;
pub mod checkout;
pub mod events;
pub mod health;
pub mod me;
pub mod newsletter;
pub mod organizer;
pub mod profile;

pub use auth::*;
pub use checkout::*;
pub use events::*;
pub use health::*;
pub use me::*;
pub use newsletter::*;
pub use organizer::*;
pub use profile::*;

use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::{ApiError, Result};

/// Runs a service call that hashes passwords or writes to disk off the
/// async workers.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> akwaaba_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// A downloadable text body.
pub(crate) fn attachment(content_type: &'static str, filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

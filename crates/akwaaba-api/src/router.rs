//! Router configuration and server setup.

use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Health
        .route("/api/health", get(handlers::health))
        // Accounts
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/me", get(handlers::me))
        .route("/api/profile", put(handlers::update_profile))
        .route("/api/profile/password", post(handlers::change_password))
        .route("/api/subscribe", post(handlers::subscribe))
        // Public catalog
        .route("/api/events", get(handlers::list_events))
        .route("/api/events/:id", get(handlers::get_event))
        .route("/api/events/:id/ics", get(handlers::event_ics))
        .route("/api/categories", get(handlers::list_categories))
        // Checkout
        .route("/api/events/:id/quote", post(handlers::quote))
        .route("/api/events/:id/purchase", post(handlers::purchase))
        // Attendee
        .route("/api/me/dashboard", get(handlers::my_dashboard))
        .route("/api/me/tickets", get(handlers::my_tickets))
        .route("/api/me/transactions", get(handlers::my_transactions))
        .route(
            "/api/me/transactions/export.csv",
            get(handlers::export_my_transactions),
        )
        // Organizer
        .route("/api/organizer/dashboard", get(handlers::dashboard))
        .route(
            "/api/organizer/events",
            get(handlers::list_my_events).post(handlers::create_event),
        )
        .route(
            "/api/organizer/events/:id",
            get(handlers::get_my_event)
                .put(handlers::update_event)
                .delete(handlers::delete_event),
        )
        .route(
            "/api/organizer/events/:id/publish",
            post(handlers::publish_event),
        )
        .route(
            "/api/organizer/events/:id/unpublish",
            post(handlers::unpublish_event),
        )
        .route(
            "/api/organizer/events/:id/duplicate",
            post(handlers::duplicate_event),
        )
        .route(
            "/api/organizer/events/:id/attendees",
            get(handlers::event_attendees),
        )
        .route(
            "/api/organizer/events/:id/tiers/:tier/tickets",
            get(handlers::tier_tickets),
        )
        .route(
            "/api/organizer/events/:id/tiers/:tier/export.csv",
            get(handlers::export_tier_tickets),
        )
        // Apply middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Starts the API server.
pub async fn serve(state: AppState) -> Result<(), std::io::Error> {
    let addr = state.config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}

//! Newsletter handler.

use axum::{
    extract::State,
    http::{header::USER_AGENT, HeaderMap},
    Json,
};

use super::blocking;
use crate::error::Result;
use crate::state::AppState;
use crate::types::{SubscribeRequest, SubscribeResponse};

/// First address in `X-Forwarded-For`, else `X-Real-IP`.
fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    };
    forwarded.or_else(real_ip).unwrap_or_default().to_string()
}

/// POST /api/subscribe - Subscribe an email to the newsletter.
pub async fn subscribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>> {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let ip = client_ip(&headers);
    let newsletter = state.services.newsletter.clone();
    let (_, created) = blocking(move || {
        newsletter.subscribe(&req.email, req.source.as_deref(), &ip, &user_agent)
    })
    .await?;
    Ok(Json(SubscribeResponse {
        message: "Thanks! You're subscribed.".to_string(),
        created,
    }))
}

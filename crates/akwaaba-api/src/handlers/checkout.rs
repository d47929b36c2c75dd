//! Checkout handlers: quote and purchase.

use akwaaba_core::{Purchase, PurchaseRequest, Quote};
use akwaaba_models::EventId;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::blocking;
use crate::auth::AttendeeUser;
use crate::error::Result;
use crate::state::AppState;
use crate::types::QuoteRequest;

/// POST /api/events/:id/quote - Price a purchase without buying.
pub async fn quote(
    State(state): State<AppState>,
    _attendee: AttendeeUser,
    Path(id): Path<String>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<Quote>> {
    let quote = state.services.box_office.quote(
        &EventId::from_string(id),
        req.tier_index,
        req.quantity.unwrap_or(1),
    )?;
    Ok(Json(quote))
}

/// POST /api/events/:id/purchase - Buy tickets.
pub async fn purchase(
    State(state): State<AppState>,
    AttendeeUser(attendee): AttendeeUser,
    Path(id): Path<String>,
    Json(req): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<Purchase>)> {
    let box_office = state.services.box_office.clone();
    let event_id = EventId::from_string(id);
    let purchase = blocking(move || box_office.purchase(&attendee, &event_id, req)).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

//! Public catalog handlers.

use akwaaba_core::{calendar, Page, PublicEventQuery};
use akwaaba_models::EventId;
use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use chrono::Utc;

use super::attachment;
use crate::error::Result;
use crate::state::AppState;
use crate::types::{BrowseQuery, CategoriesResponse, EventCard, EventDetailResponse, TierView};

/// GET /api/events - Browse published events.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<Page<EventCard>>> {
    let filter = PublicEventQuery::from(query);
    let page = state.services.catalog.browse(&filter)?;
    Ok(Json(page.map(|event| EventCard::from(&event))))
}

/// GET /api/events/:id - A published event with live tier availability.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventDetailResponse>> {
    let services = &state.services;
    let event = services.catalog.get_published(&EventId::from_string(id))?;
    let availability = services.box_office.tier_availability(&event)?;

    let now = Utc::now();
    let tiers = event
        .tiers
        .iter()
        .zip(availability)
        .enumerate()
        .map(|(index, (tier, avail))| TierView::new(index, tier, avail, now))
        .collect();

    let detail_url = state.config.public_link(&format!("/api/events/{}", event.id));
    Ok(Json(EventDetailResponse {
        lifecycle: event.lifecycle(now),
        where_text: event.where_text(),
        tiers,
        ics_url: format!("/api/events/{}/ics", event.id),
        google_calendar_url: calendar::google_calendar_link(&event, &detail_url),
        event,
    }))
}

/// GET /api/events/:id/ics - Calendar file for a published event.
pub async fn event_ics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let event = state
        .services
        .catalog
        .get_published(&EventId::from_string(id))?;
    Ok(attachment(
        "text/calendar; charset=utf-8",
        &calendar::ics_filename(&event),
        calendar::to_ics(&event, Utc::now()),
    ))
}

/// GET /api/categories - Category slugs used by published events.
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<CategoriesResponse>> {
    Ok(Json(CategoriesResponse {
        categories: state.services.catalog.categories()?,
    }))
}

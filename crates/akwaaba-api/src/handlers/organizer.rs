//! Organizer handlers: event management, reports and ticket exports.

use akwaaba_core::{
    AttendeeReport, Dashboard, EventDraft, OrganizerEventQuery, OrganizerEventRow, Page,
};
use akwaaba_models::{Event, EventId, Ticket};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::Utc;

use super::{attachment, blocking};
use crate::auth::OrganizerUser;
use crate::error::Result;
use crate::state::AppState;
use crate::types::{CreateEventRequest, OrganizerEventsQuery, SuccessResponse};

/// GET /api/organizer/dashboard - Counts, sales and upcoming events.
pub async fn dashboard(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
) -> Result<Json<Dashboard>> {
    let dashboard = state
        .services
        .reports
        .organizer_dashboard(&organizer, Utc::now())?;
    Ok(Json(dashboard))
}

/// GET /api/organizer/events - The organizer's events with sales counts.
pub async fn list_my_events(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
    Query(query): Query<OrganizerEventsQuery>,
) -> Result<Json<Page<OrganizerEventRow>>> {
    let filter = OrganizerEventQuery::from(query);
    let page = state
        .services
        .catalog
        .list_for_organizer(&organizer, &filter, Utc::now())?;
    Ok(Json(page))
}

/// POST /api/organizer/events - Create an event as draft or published.
pub async fn create_event(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    let catalog = state.services.catalog.clone();
    let event = blocking(move || catalog.create(&organizer, req.draft, req.publish)).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/organizer/events/:id - One of the organizer's events.
pub async fn get_my_event(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
    Path(id): Path<String>,
) -> Result<Json<Event>> {
    let event = state
        .services
        .catalog
        .get_owned(&organizer, &EventId::from_string(id))?;
    Ok(Json(event))
}

/// PUT /api/organizer/events/:id - Replace an event's details and tiers.
pub async fn update_event(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
    Path(id): Path<String>,
    Json(draft): Json<EventDraft>,
) -> Result<Json<Event>> {
    let catalog = state.services.catalog.clone();
    let event_id = EventId::from_string(id);
    let event = blocking(move || catalog.update(&organizer, &event_id, draft)).await?;
    Ok(Json(event))
}

/// DELETE /api/organizer/events/:id - Delete an event with no sales.
pub async fn delete_event(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let catalog = state.services.catalog.clone();
    let event_id = EventId::from_string(id);
    blocking(move || catalog.delete(&organizer, &event_id)).await?;
    Ok(Json(SuccessResponse::new("event deleted")))
}

/// POST /api/organizer/events/:id/publish
pub async fn publish_event(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
    Path(id): Path<String>,
) -> Result<Json<Event>> {
    let catalog = state.services.catalog.clone();
    let event_id = EventId::from_string(id);
    let event = blocking(move || catalog.publish(&organizer, &event_id)).await?;
    Ok(Json(event))
}

/// POST /api/organizer/events/:id/unpublish
pub async fn unpublish_event(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
    Path(id): Path<String>,
) -> Result<Json<Event>> {
    let catalog = state.services.catalog.clone();
    let event_id = EventId::from_string(id);
    let event = blocking(move || catalog.unpublish(&organizer, &event_id)).await?;
    Ok(Json(event))
}

/// POST /api/organizer/events/:id/duplicate - Copy an event as a new draft.
pub async fn duplicate_event(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Event>)> {
    let catalog = state.services.catalog.clone();
    let event_id = EventId::from_string(id);
    let copy = blocking(move || catalog.duplicate(&organizer, &event_id)).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// GET /api/organizer/events/:id/attendees - Attendee report.
pub async fn event_attendees(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
    Path(id): Path<String>,
) -> Result<Json<AttendeeReport>> {
    let report = state.services.reports.attendee_report(
        &organizer,
        &EventId::from_string(id),
        Utc::now().date_naive(),
    )?;
    Ok(Json(report))
}

/// GET /api/organizer/events/:id/tiers/:tier/tickets
pub async fn tier_tickets(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
    Path((id, tier)): Path<(String, usize)>,
) -> Result<Json<Vec<Ticket>>> {
    let tickets = state
        .services
        .box_office
        .tickets_for_tier(&organizer, &EventId::from_string(id), tier)?;
    Ok(Json(tickets))
}

/// GET /api/organizer/events/:id/tiers/:tier/export.csv
pub async fn export_tier_tickets(
    State(state): State<AppState>,
    OrganizerUser(organizer): OrganizerUser,
    Path((id, tier)): Path<(String, usize)>,
) -> Result<Response> {
    let event_id = EventId::from_string(id);
    let csv = state
        .services
        .box_office
        .export_tier_csv(&organizer, &event_id, tier)?;
    let filename = format!("{}-tier-{}.csv", event_id, tier + 1);
    Ok(attachment("text/csv; charset=utf-8", &filename, csv))
}

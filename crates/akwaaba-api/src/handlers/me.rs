//! Attendee wallet and transaction history handlers.

use akwaaba_core::{AttendeeDashboard, TransactionHistory, TransactionQuery};
use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use chrono::Utc;

use super::attachment;
use crate::auth::AttendeeUser;
use crate::error::Result;
use crate::state::AppState;
use crate::types::{TicketsResponse, TransactionsQuery};

/// GET /api/me/dashboard - Spending and upcoming/past ticket counts.
pub async fn my_dashboard(
    State(state): State<AppState>,
    AttendeeUser(attendee): AttendeeUser,
) -> Result<Json<AttendeeDashboard>> {
    let dashboard = state
        .services
        .box_office
        .attendee_dashboard(&attendee, Utc::now())?;
    Ok(Json(dashboard))
}

/// GET /api/me/tickets - The attendee's tickets, newest first.
pub async fn my_tickets(
    State(state): State<AppState>,
    AttendeeUser(attendee): AttendeeUser,
) -> Result<Json<TicketsResponse>> {
    let tickets = state.services.box_office.tickets_for_attendee(&attendee)?;
    let total = tickets.len();
    Ok(Json(TicketsResponse { tickets, total }))
}

/// GET /api/me/transactions - Filtered, paginated purchase history.
pub async fn my_transactions(
    State(state): State<AppState>,
    AttendeeUser(attendee): AttendeeUser,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<TransactionHistory>> {
    let filter = TransactionQuery::from(query);
    let history = state
        .services
        .box_office
        .transactions_for_attendee(&attendee, &filter)?;
    Ok(Json(history))
}

/// GET /api/me/transactions/export.csv - Every matching transaction as CSV.
pub async fn export_my_transactions(
    State(state): State<AppState>,
    AttendeeUser(attendee): AttendeeUser,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response> {
    let filter = TransactionQuery::from(query);
    let csv = state
        .services
        .box_office
        .export_transactions_csv(&attendee, &filter)?;
    Ok(attachment("text/csv; charset=utf-8", "transactions.csv", csv))
}

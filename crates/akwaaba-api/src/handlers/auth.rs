//! Registration, login and logout handlers.

use akwaaba_core::NewAccount;
use axum::{extract::State, http::StatusCode, Json};

use super::blocking;
use crate::auth::{AuthUser, BearerToken};
use crate::error::Result;
use crate::state::AppState;
use crate::types::{AuthResponse, LoginRequest, SuccessResponse, UserView};

/// POST /api/auth/signup - Register an organizer or attendee.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<NewAccount>,
) -> Result<(StatusCode, Json<UserView>)> {
    let accounts = state.services.accounts.clone();
    let user = blocking(move || accounts.register(req)).await?;
    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

/// POST /api/auth/login - Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let accounts = state.services.accounts.clone();
    let (session, user) = blocking(move || accounts.login(&req.identifier, &req.password)).await?;
    Ok(Json(AuthResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: UserView::from(&user),
    }))
}

/// POST /api/auth/logout - End the current session.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<SuccessResponse>> {
    state.services.accounts.logout(&token)?;
    Ok(Json(SuccessResponse::new("logged out")))
}

/// GET /api/auth/me - The logged-in user.
pub async fn me(AuthUser { user, .. }: AuthUser) -> Json<UserView> {
    Json(UserView::from(&user))
}

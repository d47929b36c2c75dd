//! Profile handlers for the logged-in user.

use akwaaba_core::ProfileUpdate;
use axum::{extract::State, Json};

use super::blocking;
use crate::auth::AuthUser;
use crate::error::Result;
use crate::state::AppState;
use crate::types::{ChangePasswordRequest, SuccessResponse, UserView};

/// PUT /api/profile - Update name, contact details or wallet.
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser { user, .. }: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserView>> {
    let updated = state.services.accounts.update_profile(&user.id, update)?;
    Ok(Json(UserView::from(&updated)))
}

/// POST /api/profile/password - Change the password.
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser { user, .. }: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<SuccessResponse>> {
    let accounts = state.services.accounts.clone();
    blocking(move || {
        accounts.change_password(
            &user.id,
            &req.current_password,
            &req.new_password,
            &req.confirm_password,
        )
    })
    .await?;
    Ok(Json(SuccessResponse::new("password updated")))
}

//! Session extractors.
//!
//! Handlers declare the caller they need by taking one of these as an
//! argument:
//!
//! - [`AuthUser`]: any logged-in user
//! - [`OrganizerUser`]: a logged-in organizer
//! - [`AttendeeUser`]: a logged-in attendee
//!
//! A missing or unknown token is 401; the wrong role is 403.

use akwaaba_core::{require_role, Session};
use akwaaba_models::{Role, User};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ApiError;
use crate::handlers::blocking;
use crate::state::AppState;

/// Bearer token from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Please log in".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ApiError::Unauthorized("Expected 'Authorization: Bearer <token>'".to_string())
            })?;

        Ok(Self(token.to_string()))
    }
}

/// A caller with a live session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub session: Session,
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let accounts = state.services.accounts.clone();
        let (session, user) = blocking(move || accounts.resolve(&token)).await?;
        Ok(Self { session, user })
    }
}

/// A logged-in organizer.
#[derive(Debug, Clone)]
pub struct OrganizerUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for OrganizerUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser { user, .. } = AuthUser::from_request_parts(parts, state).await?;
        require_role(&user, Role::Organizer)?;
        Ok(Self(user))
    }
}

/// A logged-in attendee.
#[derive(Debug, Clone)]
pub struct AttendeeUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AttendeeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser { user, .. } = AuthUser::from_request_parts(parts, state).await?;
        require_role(&user, Role::Attendee)?;
        Ok(Self(user))
    }
}

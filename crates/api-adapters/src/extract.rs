//! Bearer-token authentication extractor.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use domains::{AppError, User};

use crate::{error::ApiError, state::AppState};

/// The authenticated caller, loaded fresh from the user store on every
/// request. A valid token whose account has since vanished is rejected the
/// same way as a bad token.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;

        let claims = state.tokens.verify(token)?;
        let user = state
            .users
            .get(claims.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("account no longer exists".into()))?;

        Ok(CurrentUser(user))
    }
}

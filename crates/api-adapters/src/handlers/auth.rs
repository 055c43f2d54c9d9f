//! Registration, login, and the current-user probe.

use axum::{extract::State, http::StatusCode, Json};
use services::ProfileView;

use crate::{
    dto::{LoginRequest, LoginResponse, RegisterRequest},
    error::ApiError,
    extract::CurrentUser,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ProfileView>), ApiError> {
    let user = state.accounts.register(body.into()).await?;
    Ok((StatusCode::CREATED, Json(ProfileView::from_user(&user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (issued, user) = state.accounts.login(&body.username, &body.password).await?;
    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user: ProfileView::from_user(&user),
    }))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<ProfileView> {
    Json(ProfileView::from_user(&user))
}

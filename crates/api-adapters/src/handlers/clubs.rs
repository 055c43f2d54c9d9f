//! Book club membership surface.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use services::{ClubDetail, ClubDirectoryEntry, ClubSummary};
use uuid::Uuid;

use crate::{
    dto::{AddMemberRequest, CreateClubRequest, MessageResponse},
    error::ApiError,
    extract::CurrentUser,
    state::AppState,
};

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateClubRequest>,
) -> Result<(StatusCode, Json<ClubDirectoryEntry>), ApiError> {
    let club = state.membership.create_club(user.id, body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ClubDirectoryEntry::for_viewer(&club, user.id)),
    ))
}

pub async fn directory(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ClubDirectoryEntry>>, ApiError> {
    Ok(Json(state.membership.directory(user.id).await?))
}

pub async fn my_clubs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ClubSummary>>, ApiError> {
    Ok(Json(state.membership.clubs_for_user(user.id).await?))
}

pub async fn detail(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(club_id): Path<Uuid>,
) -> Result<Json<ClubDetail>, ApiError> {
    Ok(Json(state.membership.club_detail(club_id).await?))
}

pub async fn join(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(club_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.membership.join_public(club_id, user.id).await?;
    Ok(Json(MessageResponse::new("Joined successfully")))
}

pub async fn request(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(club_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.membership.request_to_join(club_id, user.id).await?;
    Ok(Json(MessageResponse::new("Request sent successfully")))
}

pub async fn accept(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Path((club_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.membership.assert_admin(club_id, admin.id).await?;
    state.membership.accept_request(club_id, user_id).await?;
    Ok(Json(MessageResponse::new("Request accepted successfully")))
}

pub async fn deny(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Path((club_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.membership.assert_admin(club_id, admin.id).await?;
    state.membership.deny_request(club_id, user_id).await?;
    Ok(Json(MessageResponse::new("Request denied successfully")))
}

pub async fn add_member(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(club_id): Path<Uuid>,
    Json(body): Json<AddMemberRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.membership.add_member(club_id, body.user_id).await?;
    Ok(Json(MessageResponse::new("Member added successfully")))
}

//! Review surface.

use axum::{
    extract::{Path, State},
    Json,
};
use domains::{AppError, ReviewDisposition};
use services::ReviewView;

use crate::{
    dto::{ReviewRequest, ReviewWriteResponse},
    error::ApiError,
    extract::CurrentUser,
    state::AppState,
};

pub async fn upsert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<ReviewWriteResponse>, ApiError> {
    if !(1..=5).contains(&body.rating) {
        return Err(ApiError(AppError::ValidationError(
            "rating must be between 1 and 5".into(),
        )));
    }

    let outcome = state
        .reviews
        .add_or_update(&body.ibn, user.id, body.rating, body.comment)
        .await?;

    let message = match outcome.disposition {
        ReviewDisposition::Created => "Review added successfully",
        ReviewDisposition::Updated => "Review updated successfully",
    };
    Ok(Json(ReviewWriteResponse {
        message,
        avg_rating: outcome.avg_rating,
    }))
}

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(ibn): Path<String>,
) -> Result<Json<Vec<ReviewView>>, ApiError> {
    Ok(Json(state.reviews.list_for_book(&ibn).await?))
}

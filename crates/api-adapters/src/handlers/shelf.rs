//! Personal bookshelf surface.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domains::Book;

use crate::{
    dto::{MessageResponse, ShelfRequest, TitleQuery},
    error::ApiError,
    extract::CurrentUser,
    state::AppState,
};

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.shelf.books_for(user.id).await?))
}

pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ShelfRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.shelf.add(user.id, &body.ibn).await?;
    Ok(Json(MessageResponse::new("Book added to bookshelf")))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ibn): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.shelf.remove(user.id, &ibn).await?;
    Ok(Json(MessageResponse::new("Book removed from bookshelf")))
}

/// Catalog titles matching the query that are not already on the shelf.
pub async fn search(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<TitleQuery>,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(
        state.shelf.search_candidates(user.id, &query.title).await?,
    ))
}

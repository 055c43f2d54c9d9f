//! Catalog surface. Book documents serialize with their stored snake_case
//! fields, reviews included.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domains::Book;

use crate::{
    dto::{NewBookRequest, SearchQuery},
    error::ApiError,
    extract::CurrentUser,
    state::AppState,
};

pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewBookRequest>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = state.catalog.add_book(user.id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(ibn): Path<String>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.catalog.get_book(&ibn).await?))
}

pub async fn search(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.catalog.search(&query.query).await?))
}

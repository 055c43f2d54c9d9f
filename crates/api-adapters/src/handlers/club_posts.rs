//! Club post surface: posts, likes, comments, replies, and the home feed.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use domains::{AppError, Comment, Reply};
use mime::Mime;
use services::{FeedItemView, PostView};
use uuid::Uuid;

use crate::{
    dto::{CommentRequest, FeedQuery, MessageResponse},
    error::ApiError,
    extract::CurrentUser,
    state::AppState,
};

/// Multipart form: `content` (required), `tags` (comma-separated,
/// optional), `image` (optional file part).
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(club_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PostView>), ApiError> {
    let mut content = String::new();
    let mut tags: Option<String> = None;
    let mut image: Option<(Bytes, Mime)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("content") => content = field.text().await.map_err(bad_multipart)?,
            Some("tags") => tags = Some(field.text().await.map_err(bad_multipart)?),
            Some("image") => {
                let mime = sniff_part_mime(field.content_type(), field.file_name());
                let data = field.bytes().await.map_err(bad_multipart)?;
                if !data.is_empty() {
                    image = Some((data, mime));
                }
            }
            _ => {}
        }
    }

    let post = state
        .feed
        .create_post(club_id, user.id, content, tags, image)
        .await?;
    let view = state.feed.view_of(&post, &user);
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(club_id): Path<Uuid>,
) -> Result<Json<Vec<PostView>>, ApiError> {
    Ok(Json(state.feed.list_posts(club_id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.feed.delete_post(post_id, user.id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

/// Returns the new like count as a bare JSON number, which is what the
/// client binds to.
pub async fn like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<usize>, ApiError> {
    Ok(Json(state.feed.toggle_like(post_id, user.id).await?))
}

pub async fn comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CommentRequest>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(
        state.feed.add_comment(post_id, user.id, body.text).await?,
    ))
}

pub async fn reply(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<CommentRequest>,
) -> Result<Json<Vec<Reply>>, ApiError> {
    Ok(Json(
        state
            .feed
            .add_reply(post_id, comment_id, user.id, body.text)
            .await?,
    ))
}

pub async fn feed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<FeedItemView>>, ApiError> {
    Ok(Json(state.feed.feed_for_user(user.id, query.limit).await?))
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError(AppError::ValidationError(format!(
        "malformed multipart body: {err}"
    )))
}

/// Trusts the part's declared content type first, then the file name.
fn sniff_part_mime(content_type: Option<&str>, file_name: Option<&str>) -> Mime {
    content_type
        .and_then(|ct| ct.parse::<Mime>().ok())
        .or_else(|| file_name.map(|n| mime_guess::from_path(n).first_or_octet_stream()))
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

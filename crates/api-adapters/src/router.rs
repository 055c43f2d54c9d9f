//! Route table and middleware stack.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use configs::Settings;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, books, club_posts, clubs, reviews, shelf},
    metrics,
    state::AppState,
};

/// The full application router. Uploaded media is served straight off the
/// local store under the configured prefix.
pub fn build_router(state: AppState, settings: &Settings) -> Router {
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/clubs", post(clubs::create))
        .route("/clubs/all", get(clubs::directory))
        .route("/clubs/my-clubs", get(clubs::my_clubs))
        .route("/clubs/{id}", get(clubs::detail))
        .route("/clubs/{id}/join", post(clubs::join))
        .route("/clubs/{id}/request", post(clubs::request))
        .route("/clubs/{id}/accept/{user}", post(clubs::accept))
        .route("/clubs/{id}/deny/{user}", post(clubs::deny))
        .route("/clubs/{id}/add-member", post(clubs::add_member))
        .route(
            "/club-posts/club/{club}",
            post(club_posts::create).get(club_posts::list),
        )
        .route("/club-posts/{post}", delete(club_posts::delete))
        .route("/club-posts/like/{post}", post(club_posts::like))
        .route("/club-posts/comment/{post}", post(club_posts::comment))
        .route("/club-posts/reply/{post}/{comment}", post(club_posts::reply))
        .route("/club-posts/feed", get(club_posts::feed))
        .route("/reviews", post(reviews::upsert))
        .route("/reviews/{ibn}", get(reviews::list))
        .route("/books", post(books::add))
        .route("/books/search", get(books::search))
        .route("/books/{ibn}", get(books::get))
        .route("/shelf", get(shelf::list).post(shelf::add))
        .route("/shelf/search", get(shelf::search))
        .route("/shelf/{ibn}", delete(shelf::remove));

    Router::new()
        .nest("/api", api)
        .route("/healthz", get(|| async { "ok" }))
        .route("/metrics", get(metrics::render_metrics))
        .nest_service(
            &settings.media.url_prefix,
            ServeDir::new(&settings.media.root_dir),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            metrics::track,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.http.cors_allow_origin))
        .layer(CompressionLayer::new())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(DefaultBodyLimit::max(settings.http.max_upload_bytes))
        .with_state(state)
}

fn cors_layer(allow_origin: &str) -> CorsLayer {
    let origin = if allow_origin == "*" {
        AllowOrigin::any()
    } else {
        match allow_origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(%allow_origin, "unparseable CORS origin, allowing any");
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

//! Shared harness for the workspace-level suites: fixture builders plus
//! service and router wiring over the in-memory adapters.

// Each test target compiles its own copy and uses a subset of this module.
#![allow(dead_code)]

use std::sync::Arc;

use auth_adapters::{Argon2CredentialHasher, JwtTokenIssuer};
use chrono::Utc;
use domains::{Book, User};
use fake::faker::internet::en::Username;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use services::{
    AccountService, CatalogService, FeedService, MembershipService, ReviewService, ShelfService,
};
use storage_adapters::{MemoryMediaStore, MemoryStore};
use uuid::Uuid;

/// Minimal PNG header; enough for the format sniffing the media stores do.
pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\nrest-of-file";

/// A user with the given handle and a generated display name.
pub fn user_named(username: &str) -> User {
    User::new(
        Name().fake(),
        username.to_string(),
        format!("{username}@example.net"),
        "$argon2id$v=19$test-only".into(),
    )
}

/// A user nobody else in the test refers to by handle. The uuid suffix
/// keeps generated handles from ever colliding within a run.
pub fn some_user() -> User {
    let handle: String = Username().fake();
    user_named(&format!("{}-{}", handle, Uuid::now_v7().simple()))
}

/// A catalog entry with no reviews yet.
pub fn book_titled(ibn: &str, title: &str, author: &str) -> Book {
    let now = Utc::now();
    Book {
        id: Uuid::now_v7(),
        ibn: ibn.into(),
        title: title.into(),
        author: author.into(),
        language: "en".into(),
        cover_img: String::new(),
        description: Sentence(3..8).fake(),
        buy_url: String::new(),
        year: Some((1900..2024).fake()),
        genre: vec!["fiction".into()],
        reviews: Vec::new(),
        avg_rating: 0.0,
        added_by: None,
        created_at: now,
        updated_at: now,
    }
}

/// Every engine wired over one shared in-memory store, the way the binary
/// wires them over Postgres.
pub struct TestBed {
    pub store: Arc<MemoryStore>,
    pub media: Arc<MemoryMediaStore>,
    pub accounts: AccountService,
    pub membership: MembershipService,
    pub feed: FeedService,
    pub reviews: ReviewService,
    pub catalog: CatalogService,
    pub shelf: ShelfService,
}

impl TestBed {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(MemoryMediaStore::new());
        let hasher = Arc::new(Argon2CredentialHasher::new());
        let tokens = Arc::new(JwtTokenIssuer::new(b"integration-test-secret", 1));

        Self {
            accounts: AccountService::new(store.clone(), hasher, tokens),
            membership: MembershipService::new(store.clone(), store.clone()),
            feed: FeedService::new(store.clone(), store.clone(), store.clone(), media.clone()),
            reviews: ReviewService::new(store.clone(), store.clone()),
            catalog: CatalogService::new(store.clone()),
            shelf: ShelfService::new(store.clone(), store.clone()),
            store,
            media,
        }
    }

    /// Puts a prebuilt user straight into the store, skipping registration.
    pub async fn seed_user(&self, user: &User) {
        use domains::UserRepo;
        self.store.insert(user).await.expect("seeding user");
    }

    /// Puts a prebuilt book straight into the store, skipping the catalog.
    pub async fn seed_book(&self, book: &Book) {
        use domains::BookRepo;
        self.store.insert(book).await.expect("seeding book");
    }
}

#[cfg(feature = "web-axum")]
pub mod api {
    use super::*;

    use api_adapters::{build_router, metrics::HttpMetrics, AppState};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use configs::Settings;
    use domains::MediaStorage;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    pub fn app_state(store: Arc<MemoryStore>, media: Arc<dyn MediaStorage>) -> AppState {
        let hasher = Arc::new(Argon2CredentialHasher::new());
        let tokens = Arc::new(JwtTokenIssuer::new(b"integration-test-secret", 1));

        AppState {
            accounts: AccountService::new(store.clone(), hasher, tokens.clone()),
            membership: MembershipService::new(store.clone(), store.clone()),
            feed: FeedService::new(store.clone(), store.clone(), store.clone(), media),
            reviews: ReviewService::new(store.clone(), store.clone()),
            catalog: CatalogService::new(store.clone()),
            shelf: ShelfService::new(store.clone(), store.clone()),
            users: store.clone(),
            tokens,
            metrics: Arc::new(HttpMetrics::new()),
        }
    }

    /// A router over fresh in-memory adapters and default settings.
    pub fn router() -> Router {
        let store = Arc::new(MemoryStore::new());
        let media: Arc<dyn MediaStorage> = Arc::new(MemoryMediaStore::new());
        build_router(app_state(store, media), &Settings::default())
    }

    pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    pub fn json_request(
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    /// Registers an account over HTTP and returns a live bearer token.
    pub async fn sign_up(app: &Router, username: &str) -> String {
        let (status, _) = send(
            app,
            json_request(
                Method::POST,
                "/api/auth/register",
                None,
                json!({
                    "name": format!("{username} Person"),
                    "username": username,
                    "email": format!("{username}@example.net"),
                    "password": "hunter22",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            json_request(
                Method::POST,
                "/api/auth/login",
                None,
                json!({ "username": username, "password": "hunter22" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    /// Hand-built multipart body for the post-creation endpoint.
    pub fn multipart_post(
        uri: &str,
        token: &str,
        content: Option<&str>,
        tags: Option<&str>,
        image: Option<(&[u8], &str)>,
    ) -> Request<Body> {
        let boundary = "integration-test-boundary";
        let mut body = Vec::new();
        if let Some(content) = content {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"content\"\r\n\r\n{content}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(tags) = tags {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"tags\"\r\n\r\n{tags}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((bytes, mime)) = image {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"upload.png\"\r\nContent-Type: {mime}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body))
            .unwrap()
    }
}

//! Catalog, review, and bookshelf surfaces over the wire.

mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::api::{get_request, json_request, router, send, sign_up};

async fn add_book(app: &axum::Router, token: &str, ibn: &str, title: &str, author: &str) {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/books",
            Some(token),
            json!({ "ibn": ibn, "title": title, "author": author }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["avg_rating"], 0.0);
    assert!(body["reviews"].as_array().unwrap().is_empty());
}

fn review_body(ibn: &str, rating: i32, comment: &str) -> serde_json::Value {
    json!({ "ibn": ibn, "rating": rating, "comment": comment })
}

#[tokio::test]
async fn reviews_reshape_the_served_book_document() {
    let app = router();
    let first = sign_up(&app, "first-reader").await;
    let second = sign_up(&app, "second-reader").await;
    add_book(&app, &first, "978-0441172719", "Dune", "Frank Herbert").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/reviews",
            Some(&first),
            review_body("978-0441172719", 5, "a desert classic"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review added successfully");
    assert_eq!(body["avg_rating"], 5.0);

    let (_, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/reviews",
            Some(&second),
            review_body("978-0441172719", 3, "drags in the middle"),
        ),
    )
    .await;
    assert_eq!(body["avg_rating"], 4.0);

    // The book document itself carries the embedded reviews and the average.
    let (status, book) = send(&app, get_request("/api/books/978-0441172719", Some(&first))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["avg_rating"], 4.0);
    let reviews = book["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    assert!(reviews[0].get("user_id").is_some());

    // The review listing resolves reviewers into profiles.
    let (_, listed) = send(&app, get_request("/api/reviews/978-0441172719", Some(&first))).await;
    assert_eq!(listed[0]["user"]["username"], "first-reader");
    assert_eq!(listed[1]["rating"], 3);
}

#[tokio::test]
async fn ratings_outside_one_to_five_are_rejected() {
    let app = router();
    let token = sign_up(&app, "harsh").await;

    for rating in [0, 6] {
        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                "/api/reviews",
                Some(&token),
                review_body("does-not-matter", rating, ""),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "rating must be between 1 and 5");
    }
}

#[tokio::test]
async fn a_reader_updates_their_own_review_in_place() {
    let app = router();
    let token = sign_up(&app, "second-thoughts").await;
    add_book(&app, &token, "978-0553283686", "Hyperion", "Dan Simmons").await;

    let (_, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/reviews",
            Some(&token),
            review_body("978-0553283686", 2, "confusing"),
        ),
    )
    .await;
    assert_eq!(body["message"], "Review added successfully");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/reviews",
            Some(&token),
            review_body("978-0553283686", 4, "it grew on me"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review updated successfully");
    assert_eq!(body["avg_rating"], 4.0);

    let (_, book) = send(&app, get_request("/api/books/978-0553283686", Some(&token))).await;
    assert_eq!(book["reviews"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_requires_a_query_and_ignores_case() {
    let app = router();
    let token = sign_up(&app, "browser").await;
    add_book(&app, &token, "978-0441172719", "Dune", "Frank Herbert").await;

    // Missing parameter fails in extraction, before the handler runs.
    let (status, _) = send(&app, get_request("/api/books/search", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        get_request("/api/books/search?query=%20%20", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "query is required");

    let (status, hits) = send(
        &app,
        get_request("/api/books/search?query=dUnE", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits[0]["title"], "Dune");
}

#[tokio::test]
async fn book_and_shelf_reads_require_a_token() {
    let app = router();

    for uri in [
        "/api/books/search?query=dune",
        "/api/books/978-0441172719",
        "/api/reviews/978-0441172719",
        "/api/shelf",
    ] {
        let (status, _) = send(&app, get_request(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "expected 401 for {uri}");
    }
}

#[tokio::test]
async fn the_shelf_round_trip() {
    let app = router();
    let token = sign_up(&app, "collector").await;
    add_book(&app, &token, "978-0441172719", "Dune", "Frank Herbert").await;
    add_book(&app, &token, "978-0553283686", "Hyperion", "Dan Simmons").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/shelf",
            Some(&token),
            json!({ "ibn": "978-0441172719" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book added to bookshelf");

    let (_, shelf) = send(&app, get_request("/api/shelf", Some(&token))).await;
    let shelf = shelf.as_array().unwrap();
    assert_eq!(shelf.len(), 1);
    assert_eq!(shelf[0]["title"], "Dune");

    // Candidate search skips what is already shelved.
    let (_, hits) = send(
        &app,
        get_request("/api/shelf/search?title=dune", Some(&token)),
    )
    .await;
    assert!(hits.as_array().unwrap().is_empty());
    let (_, hits) = send(
        &app,
        get_request("/api/shelf/search?title=hyperion", Some(&token)),
    )
    .await;
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let remove = json_request(
        Method::DELETE,
        "/api/shelf/978-0441172719",
        Some(&token),
        json!({}),
    );
    let (status, body) = send(&app, remove).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book removed from bookshelf");

    let (status, _) = send(
        &app,
        json_request(
            Method::DELETE,
            "/api/shelf/978-0441172719",
            Some(&token),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn an_unknown_ibn_is_not_found_on_every_surface() {
    let app = router();
    let token = sign_up(&app, "seeker").await;

    let (status, body) = send(&app, get_request("/api/books/000-none", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "book not found with ID 000-none");

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/reviews",
            Some(&token),
            review_body("000-none", 3, ""),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/shelf",
            Some(&token),
            json!({ "ibn": "000-none" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

//! Bookshelf engine over the real in-memory store.

mod support;

use domains::AppError;
use services::NewBook;
use support::{some_user, TestBed};
use uuid::Uuid;

async fn catalog_three(bed: &TestBed) {
    let adder = Uuid::now_v7();
    for (ibn, title) in [
        ("111", "Dune"),
        ("222", "Dune Messiah"),
        ("333", "Children of Dune"),
    ] {
        bed.catalog
            .add_book(
                adder,
                NewBook {
                    ibn: ibn.into(),
                    title: title.into(),
                    author: "Frank Herbert".into(),
                    language: "en".into(),
                    cover_img: String::new(),
                    description: String::new(),
                    buy_url: String::new(),
                    year: None,
                    genre: Vec::new(),
                },
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn the_shelf_keeps_shelving_order_not_catalog_order() {
    let bed = TestBed::new();
    catalog_three(&bed).await;
    let reader = some_user();
    bed.seed_user(&reader).await;

    for ibn in ["333", "111", "222"] {
        bed.shelf.add(reader.id, ibn).await.unwrap();
    }

    let shelf = bed.shelf.books_for(reader.id).await.unwrap();
    let ibns: Vec<&str> = shelf.iter().map(|b| b.ibn.as_str()).collect();
    assert_eq!(ibns, vec!["333", "111", "222"]);
}

#[tokio::test]
async fn removing_the_middle_book_leaves_the_rest_ordered() {
    let bed = TestBed::new();
    catalog_three(&bed).await;
    let reader = some_user();
    bed.seed_user(&reader).await;

    for ibn in ["111", "222", "333"] {
        bed.shelf.add(reader.id, ibn).await.unwrap();
    }
    bed.shelf.remove(reader.id, "222").await.unwrap();

    let shelf = bed.shelf.books_for(reader.id).await.unwrap();
    let ibns: Vec<&str> = shelf.iter().map(|b| b.ibn.as_str()).collect();
    assert_eq!(ibns, vec!["111", "333"]);
}

#[tokio::test]
async fn candidate_search_hides_what_is_already_shelved() {
    let bed = TestBed::new();
    catalog_three(&bed).await;
    let reader = some_user();
    bed.seed_user(&reader).await;
    bed.shelf.add(reader.id, "111").await.unwrap();

    let candidates = bed.shelf.search_candidates(reader.id, "dune").await.unwrap();
    let ibns: Vec<&str> = candidates.iter().map(|b| b.ibn.as_str()).collect();
    assert!(!ibns.contains(&"111"));
    assert!(ibns.contains(&"222"));
    assert!(ibns.contains(&"333"));

    // A blank query is an empty result, not an error, on this surface.
    let blank = bed.shelf.search_candidates(reader.id, "  ").await.unwrap();
    assert!(blank.is_empty());
}

#[tokio::test]
async fn shelving_needs_a_cataloged_book_and_a_known_reader() {
    let bed = TestBed::new();
    catalog_three(&bed).await;
    let reader = some_user();
    bed.seed_user(&reader).await;

    let err = bed.shelf.add(reader.id, "999").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_, _)));

    let err = bed.shelf.add(Uuid::now_v7(), "111").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_, _)));
}

#[tokio::test]
async fn double_shelving_conflicts_and_unshelving_a_stranger_is_not_found() {
    let bed = TestBed::new();
    catalog_three(&bed).await;
    let reader = some_user();
    bed.seed_user(&reader).await;
    bed.shelf.add(reader.id, "111").await.unwrap();

    let err = bed.shelf.add(reader.id, "111").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = bed.shelf.remove(reader.id, "222").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_, _)));
}

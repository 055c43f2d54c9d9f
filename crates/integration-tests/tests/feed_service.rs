//! Feed engine over the real in-memory store and media store: image
//! handling, author resolution, and the cross-club digest.

mod support;

use bytes::Bytes;
use domains::ClubPostRepo;
use services::NewClub;
use support::{some_user, TestBed, PNG_MAGIC};
use uuid::Uuid;

fn png() -> (Bytes, mime::Mime) {
    (Bytes::from_static(PNG_MAGIC), mime::IMAGE_PNG)
}

#[tokio::test]
async fn identical_images_share_one_stored_object() {
    let bed = TestBed::new();
    let club = Uuid::now_v7();
    let author = Uuid::now_v7();

    let first = bed
        .feed
        .create_post(club, author, "one".into(), None, Some(png()))
        .await
        .unwrap();
    let second = bed
        .feed
        .create_post(club, author, "two".into(), None, Some(png()))
        .await
        .unwrap();

    assert_eq!(first.image, second.image);
    assert_eq!(bed.media.object_count(), 1);

    let views = bed.feed.list_posts(club).await.unwrap();
    let url = views[0].image.as_deref().unwrap();
    assert!(url.starts_with("/static/media/"));
    assert!(url.ends_with(".png"));
}

#[tokio::test]
async fn listings_resolve_authors_down_to_replies() {
    let bed = TestBed::new();
    let poster = some_user();
    let commenter = some_user();
    bed.seed_user(&poster).await;
    bed.seed_user(&commenter).await;
    let club = Uuid::now_v7();

    let post = bed
        .feed
        .create_post(club, poster.id, "thoughts?".into(), None, None)
        .await
        .unwrap();
    let comments = bed
        .feed
        .add_comment(post.id, commenter.id, "many".into())
        .await
        .unwrap();
    bed.feed
        .add_reply(post.id, comments[0].id, poster.id, "good".into())
        .await
        .unwrap();

    let views = bed.feed.list_posts(club).await.unwrap();
    assert_eq!(views[0].author.name, poster.name);
    assert_eq!(views[0].comments[0].author.name, commenter.name);
    assert_eq!(views[0].comments[0].replies[0].author.name, poster.name);
}

#[tokio::test]
async fn the_digest_spans_only_the_readers_clubs() {
    let bed = TestBed::new();
    let reader = some_user();
    bed.seed_user(&reader).await;

    let mine = bed
        .membership
        .create_club(reader.id, club_named("Mine"))
        .await
        .unwrap();
    let other = bed
        .membership
        .create_club(Uuid::now_v7(), club_named("Other"))
        .await
        .unwrap();

    bed.feed
        .create_post(mine.id, reader.id, "visible".into(), None, None)
        .await
        .unwrap();
    bed.feed
        .create_post(other.id, Uuid::now_v7(), "hidden".into(), None, None)
        .await
        .unwrap();

    let digest = bed.feed.feed_for_user(reader.id, None).await.unwrap();
    assert_eq!(digest.len(), 1);
    assert_eq!(digest[0].content, "visible");
    assert_eq!(digest[0].club_name, "Mine");
}

#[tokio::test]
async fn the_digest_clamps_its_limit_and_orders_newest_first() {
    let bed = TestBed::new();
    let reader = some_user();
    bed.seed_user(&reader).await;
    let club = bed
        .membership
        .create_club(reader.id, club_named("Busy"))
        .await
        .unwrap();

    for i in 0..3 {
        bed.feed
            .create_post(club.id, reader.id, format!("post {i}"), None, None)
            .await
            .unwrap();
    }

    let clamped_low = bed.feed.feed_for_user(reader.id, Some(0)).await.unwrap();
    assert_eq!(clamped_low.len(), 1);
    assert_eq!(clamped_low[0].content, "post 2");

    let two = bed.feed.feed_for_user(reader.id, Some(2)).await.unwrap();
    assert_eq!(two.len(), 2);
    assert_eq!(two[0].content, "post 2");
    assert_eq!(two[1].content, "post 1");

    let absurd = bed.feed.feed_for_user(reader.id, Some(9000)).await.unwrap();
    assert_eq!(absurd.len(), 3);
}

#[tokio::test]
async fn deleting_an_image_post_cleans_the_stored_object() {
    let bed = TestBed::new();
    let author = Uuid::now_v7();

    let post = bed
        .feed
        .create_post(Uuid::now_v7(), author, "with image".into(), None, Some(png()))
        .await
        .unwrap();
    assert_eq!(bed.media.object_count(), 1);

    bed.feed.delete_post(post.id, author).await.unwrap();
    assert_eq!(bed.media.object_count(), 0);
    assert!(bed.store.get(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn a_shared_image_outlives_the_first_post_deleted() {
    let bed = TestBed::new();
    let club = Uuid::now_v7();
    let author = Uuid::now_v7();

    let first = bed
        .feed
        .create_post(club, author, "one".into(), None, Some(png()))
        .await
        .unwrap();
    let second = bed
        .feed
        .create_post(club, author, "two".into(), None, Some(png()))
        .await
        .unwrap();
    let media_id = first.image.clone().unwrap();
    assert_eq!(second.image.as_deref(), Some(media_id.as_str()));

    bed.feed.delete_post(first.id, author).await.unwrap();
    assert!(bed.media.contains(&media_id));
    let views = bed.feed.list_posts(club).await.unwrap();
    assert_eq!(views.len(), 1);
    assert!(views[0].image.is_some());

    // The last referencing post takes the object with it.
    bed.feed.delete_post(second.id, author).await.unwrap();
    assert!(!bed.media.contains(&media_id));
    assert_eq!(bed.media.object_count(), 0);
}

#[tokio::test]
async fn like_toggles_persist_through_the_store() {
    let bed = TestBed::new();
    let reader = Uuid::now_v7();
    let post = bed
        .feed
        .create_post(Uuid::now_v7(), Uuid::now_v7(), "like me".into(), None, None)
        .await
        .unwrap();

    assert_eq!(bed.feed.toggle_like(post.id, reader).await.unwrap(), 1);
    let stored = bed.store.get(post.id).await.unwrap().unwrap();
    assert!(stored.is_liked_by(reader));

    assert_eq!(bed.feed.toggle_like(post.id, reader).await.unwrap(), 0);
    let stored = bed.store.get(post.id).await.unwrap().unwrap();
    assert!(!stored.is_liked_by(reader));
}

fn club_named(name: &str) -> NewClub {
    NewClub {
        name: name.into(),
        description: String::new(),
        avatar: String::new(),
        privacy: "public".into(),
    }
}

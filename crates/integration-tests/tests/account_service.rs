//! Account engine over the real in-memory store, real Argon2 hashing, and
//! real JWT issuance. The mock-based unit tests live with the service;
//! this suite checks the pieces agree with each other.

mod support;

use chrono::Utc;
use domains::{AppError, UserRepo};
use services::NewAccount;
use support::TestBed;

fn account(username: &str) -> NewAccount {
    NewAccount {
        name: format!("{username} Person"),
        username: username.into(),
        email: format!("{username}@example.net"),
        password: "hunter22".into(),
        bio: None,
        age: None,
    }
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let bed = TestBed::new();
    let registered = bed.accounts.register(account("maya")).await.unwrap();

    let (issued, user) = bed.accounts.login("maya", "hunter22").await.unwrap();
    assert_eq!(user.id, registered.id);
    assert!(!issued.token.is_empty());
    assert!(issued.expires_at > Utc::now());
}

#[tokio::test]
async fn passwords_are_argon2_hashed_at_rest() {
    let bed = TestBed::new();
    bed.accounts.register(account("ben")).await.unwrap();

    let stored = bed.store.get_by_username("ben").await.unwrap().unwrap();
    assert!(stored.password_hash.starts_with("$argon2"));
    assert!(!stored.password_hash.contains("hunter22"));
}

#[tokio::test]
async fn a_real_hash_still_rejects_the_wrong_password() {
    let bed = TestBed::new();
    bed.accounts.register(account("caro")).await.unwrap();

    let err = bed.accounts.login("caro", "hunter23").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let bed = TestBed::new();
    bed.accounts.register(account("ada")).await.unwrap();

    let mut rival = account("ada2");
    rival.email = "ada@example.net".into();
    let err = bed.accounts.register(rival).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn identity_fields_are_trimmed_before_storage() {
    let bed = TestBed::new();
    let registered = bed
        .accounts
        .register(NewAccount {
            name: "  Padded Person  ".into(),
            username: " padded ".into(),
            email: " padded@example.net ".into(),
            password: "hunter22".into(),
            bio: Some("   ".into()),
            age: None,
        })
        .await
        .unwrap();
    assert_eq!(registered.username, "padded");
    assert_eq!(registered.name, "Padded Person");
    assert_eq!(registered.email, "padded@example.net");
    // A blank bio stores as absent, not as whitespace.
    assert_eq!(registered.bio, None);

    bed.accounts.login("padded", "hunter22").await.unwrap();
}

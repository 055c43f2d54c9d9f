//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.
//! All fallible operations speak `AppError`; adapters translate their
//! native failures (driver errors, crypto errors) at this boundary.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use mime::Mime;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Book, BookClub, ClubPost, User};

#[cfg(feature = "testing")]
use mockall::automock;

/// Persistence contract for user accounts and bookshelves.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Inserts a fresh account; duplicate username or email is a Conflict.
    async fn insert(&self, user: &User) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Fetches whichever of the requested users exist; missing ids are skipped.
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<User>>;
    /// Replaces the stored document wholesale. Last write wins.
    async fn update(&self, user: &User) -> Result<()>;
}

/// Persistence contract for the book catalog (reviews ride inside the doc).
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait BookRepo: Send + Sync {
    /// Inserts a new catalog entry; a duplicate ibn is a Conflict.
    async fn insert(&self, book: &Book) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Book>>;
    async fn get_by_ibn(&self, ibn: &str) -> Result<Option<Book>>;
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Book>>;
    /// Case-insensitive substring match over title and author.
    async fn search(&self, query: &str) -> Result<Vec<Book>>;
    async fn update(&self, book: &Book) -> Result<()>;
}

/// Persistence contract for book clubs.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait ClubRepo: Send + Sync {
    async fn insert(&self, club: &BookClub) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<BookClub>>;
    async fn list_all(&self) -> Result<Vec<BookClub>>;
    /// Clubs whose member list contains the user.
    async fn list_for_member(&self, user: Uuid) -> Result<Vec<BookClub>>;
    async fn update(&self, club: &BookClub) -> Result<()>;
}

/// Persistence contract for club feed posts.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait ClubPostRepo: Send + Sync {
    async fn insert(&self, post: &ClubPost) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<ClubPost>>;
    /// All posts of one club, newest first.
    async fn list_for_club(&self, club: Uuid) -> Result<Vec<ClubPost>>;
    /// The most recent posts across a set of clubs, newest first.
    async fn list_recent_for_clubs(&self, clubs: &[Uuid], limit: i64) -> Result<Vec<ClubPost>>;
    /// Whether any stored post references this media id. Uploads are
    /// content-addressed, so posts can share one stored image.
    async fn any_with_image(&self, media_id: &str) -> Result<bool>;
    async fn update(&self, post: &ClubPost) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Password hashing contract.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Produces a self-describing hash string (PHC format).
    async fn hash(&self, password: &str) -> Result<String>;
    /// Verifies a password against a stored hash; false on malformed hashes.
    async fn verify(&self, password: &str, hash: &str) -> bool;
}

/// A signed bearer token plus its expiry, handed to clients at login.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Claims recovered from a verified bearer token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
}

/// Bearer-token contract: issuance at login, verification on every request.
#[cfg_attr(feature = "testing", automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User) -> Result<IssuedToken>;
    fn verify(&self, token: &str) -> Result<TokenClaims>;
}

/// Media storage contract for post images.
#[cfg_attr(feature = "testing", automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Saves raw bytes and returns a media id for the ClubPost model.
    async fn save(&self, data: Bytes, content_type: Mime) -> Result<String>;
    /// Removes the stored object; an unknown id is a NotFound.
    async fn delete(&self, media_id: &str) -> Result<()>;
    /// Public URL under which the router serves this media id.
    fn public_url(&self, media_id: &str) -> String;
}

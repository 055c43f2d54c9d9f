//! Request and response payloads.
//!
//! Field names mirror what the web client sends today: club-side bodies use
//! camelCase, book bodies keep their snake_case catalog fields. Responses
//! with no natural payload carry a short `{"message": ...}` body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use services::{NewAccount, NewBook, NewClub, ProfileView};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
}

impl From<RegisterRequest> for NewAccount {
    fn from(r: RegisterRequest) -> Self {
        NewAccount {
            name: r.name,
            username: r.username,
            email: r.email,
            password: r.password,
            bio: r.bio,
            age: r.age,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: ProfileView,
}

#[derive(Debug, Deserialize)]
pub struct CreateClubRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avatar: String,
    pub privacy: String,
}

impl From<CreateClubRequest> for NewClub {
    fn from(r: CreateClubRequest) -> Self {
        NewClub {
            name: r.name,
            description: r.description,
            avatar: r.avatar,
            privacy: r.privacy,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub ibn: String,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewWriteResponse {
    pub message: &'static str,
    pub avg_rating: f64,
}

#[derive(Debug, Deserialize)]
pub struct NewBookRequest {
    pub ibn: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub cover_img: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub buy_url: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub genre: Vec<String>,
}

impl From<NewBookRequest> for NewBook {
    fn from(r: NewBookRequest) -> Self {
        NewBook {
            ibn: r.ibn,
            title: r.title,
            author: r.author,
            language: r.language,
            cover_img: r.cover_img,
            description: r.description,
            buy_url: r.buy_url,
            year: r.year,
            genre: r.genre,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ShelfRequest {
    pub ibn: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// A registered reader.
///
/// The bookshelf holds Book ids in the order they were shelved; other
/// aggregates reference users weakly, so a User is never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Login handle, unique across the system
    pub username: String,
    pub email: String,
    /// Argon2 PHC string, never serialized out through the API layer
    pub password_hash: String,
    pub avatar: String,
    // Optional profile fields; absent in documents stored before they existed
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    /// Ordered list of shelved Book ids (insertion order preserved)
    pub bookshelf: Vec<Uuid>,
    pub reading_goals: ReadingGoals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Yearly reading stats surfaced on the home page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingGoals {
    /// Books the reader aims to finish this year
    pub year: i32,
    pub completed: i32,
    pub pages_read: i64,
}

impl Default for ReadingGoals {
    fn default() -> Self {
        Self { year: 5, completed: 0, pages_read: 0 }
    }
}

impl User {
    pub fn new(name: String, username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            username,
            email,
            password_hash,
            avatar: String::new(),
            bio: None,
            age: None,
            bookshelf: Vec::new(),
            reading_goals: ReadingGoals::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_shelved(&self, book_id: Uuid) -> bool {
        self.bookshelf.contains(&book_id)
    }

    /// Appends a book to the shelf, rejecting duplicates.
    pub fn shelve_book(&mut self, book_id: Uuid) -> Result<()> {
        if self.has_shelved(book_id) {
            return Err(AppError::Conflict("book is already in the bookshelf".into()));
        }
        self.bookshelf.push(book_id);
        self.touch();
        Ok(())
    }

    /// Removes a book from the shelf; the rest keep their relative order.
    pub fn unshelve_book(&mut self, book_id: Uuid) -> Result<()> {
        let before = self.bookshelf.len();
        self.bookshelf.retain(|id| *id != book_id);
        if self.bookshelf.len() == before {
            return Err(AppError::NotFound("shelved book".into(), book_id.to_string()));
        }
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

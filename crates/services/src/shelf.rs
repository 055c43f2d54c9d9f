//! # Bookshelf engine
//!
//! A user's personal shelf is a list of catalog book ids stored on the user
//! document. Shelving therefore touches two stores: the catalog is read to
//! resolve the ibn, the user is written to record membership.

use std::sync::Arc;

use domains::{AppError, Book, BookRepo, Result, UserRepo};
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct ShelfService {
    users: Arc<dyn UserRepo>,
    books: Arc<dyn BookRepo>,
}

impl ShelfService {
    pub fn new(users: Arc<dyn UserRepo>, books: Arc<dyn BookRepo>) -> Self {
        Self { users, books }
    }

    async fn require_user(&self, user_id: Uuid) -> Result<domains::User> {
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user".into(), user_id.to_string()))
    }

    /// The shelf as full book documents, in the order they were shelved.
    /// Books deleted from the catalog drop out silently.
    pub async fn books_for(&self, user_id: Uuid) -> Result<Vec<Book>> {
        let user = self.require_user(user_id).await?;
        let fetched = self.books.get_many(&user.bookshelf).await?;

        let mut shelf = Vec::with_capacity(user.bookshelf.len());
        for id in &user.bookshelf {
            if let Some(book) = fetched.iter().find(|b| b.id == *id) {
                shelf.push(book.clone());
            }
        }
        Ok(shelf)
    }

    /// Shelves the cataloged book with this ibn. Shelving twice conflicts.
    pub async fn add(&self, user_id: Uuid, ibn: &str) -> Result<Book> {
        let ibn = ibn.trim();
        if ibn.is_empty() {
            return Err(AppError::ValidationError("ibn is required".into()));
        }
        let book = self
            .books
            .get_by_ibn(ibn)
            .await?
            .ok_or_else(|| AppError::NotFound("book".into(), ibn.to_string()))?;

        let mut user = self.require_user(user_id).await?;
        user.shelve_book(book.id)?;
        self.users.update(&user).await?;

        info!(user = %user_id, book = %book.id, "book shelved");
        Ok(book)
    }

    /// Removes the book with this ibn from the shelf.
    pub async fn remove(&self, user_id: Uuid, ibn: &str) -> Result<()> {
        let ibn = ibn.trim();
        if ibn.is_empty() {
            return Err(AppError::ValidationError("ibn is required".into()));
        }
        let book = self
            .books
            .get_by_ibn(ibn)
            .await?
            .ok_or_else(|| AppError::NotFound("book".into(), ibn.to_string()))?;

        let mut user = self.require_user(user_id).await?;
        user.unshelve_book(book.id)?;
        self.users.update(&user).await?;

        info!(user = %user_id, book = %book.id, "book unshelved");
        Ok(())
    }

    /// Title search over the catalog, minus what the user already shelved.
    /// A blank title is treated as "no matches", not as an error.
    pub async fn search_candidates(&self, user_id: Uuid, title: &str) -> Result<Vec<Book>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(Vec::new());
        }
        let user = self.require_user(user_id).await?;
        let hits = self.books.search(title).await?;
        Ok(hits
            .into_iter()
            .filter(|b| !user.has_shelved(b.id))
            .collect())
    }
}

//! # Catalog engine
//!
//! The shared book catalog. Books are keyed by their ibn and carry their
//! reviews inline, so the catalog returns full documents and leaves rating
//! writes to the review engine.

use std::sync::Arc;

use chrono::Utc;
use domains::{AppError, Book, BookRepo, Result};
use tracing::info;
use uuid::Uuid;

/// A book as submitted for cataloging, before ids and timestamps exist.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub ibn: String,
    pub title: String,
    pub author: String,
    pub language: String,
    pub cover_img: String,
    pub description: String,
    pub buy_url: String,
    pub year: Option<i32>,
    pub genre: Vec<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    books: Arc<dyn BookRepo>,
}

impl CatalogService {
    pub fn new(books: Arc<dyn BookRepo>) -> Self {
        Self { books }
    }

    /// Catalogs a new book under a previously unused ibn.
    pub async fn add_book(&self, added_by: Uuid, book: NewBook) -> Result<Book> {
        let ibn = book.ibn.trim();
        if ibn.is_empty() {
            return Err(AppError::ValidationError("ibn is required".into()));
        }
        if book.title.trim().is_empty() {
            return Err(AppError::ValidationError("title is required".into()));
        }
        if book.author.trim().is_empty() {
            return Err(AppError::ValidationError("author is required".into()));
        }

        if self.books.get_by_ibn(ibn).await?.is_some() {
            return Err(AppError::Conflict("a book with this ibn already exists".into()));
        }

        let now = Utc::now();
        let book = Book {
            id: Uuid::now_v7(),
            ibn: ibn.into(),
            title: book.title.trim().into(),
            author: book.author.trim().into(),
            language: book.language,
            cover_img: book.cover_img,
            description: book.description,
            buy_url: book.buy_url,
            year: book.year,
            genre: book.genre,
            reviews: Vec::new(),
            avg_rating: 0.0,
            added_by: Some(added_by),
            created_at: now,
            updated_at: now,
        };
        self.books.insert(&book).await?;

        info!(book = %book.id, ibn = %book.ibn, "book cataloged");
        Ok(book)
    }

    pub async fn get_book(&self, ibn: &str) -> Result<Book> {
        self.books
            .get_by_ibn(ibn)
            .await?
            .ok_or_else(|| AppError::NotFound("book".into(), ibn.to_string()))
    }

    /// Case-insensitive substring search over titles and authors.
    pub async fn search(&self, query: &str) -> Result<Vec<Book>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::ValidationError("query is required".into()));
        }
        self.books.search(query).await
    }
}

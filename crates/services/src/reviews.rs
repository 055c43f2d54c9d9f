//! # Review aggregation engine
//!
//! One review per (book, user), upserted in place, with the book's average
//! rating recomputed on every write. Reads resolve reviewer display refs;
//! a book nobody has cataloged yet simply has no reviews.

use std::sync::Arc;

use domains::{AppError, BookRepo, Result, ReviewDisposition, UserRepo};
use tracing::info;
use uuid::Uuid;

use crate::views::{ReviewView, UserDirectory};

/// What an upsert did, plus the average the client should now display.
#[derive(Debug, Clone, Copy)]
pub struct ReviewOutcome {
    pub avg_rating: f64,
    pub disposition: ReviewDisposition,
}

#[derive(Clone)]
pub struct ReviewService {
    books: Arc<dyn BookRepo>,
    users: Arc<dyn UserRepo>,
}

impl ReviewService {
    pub fn new(books: Arc<dyn BookRepo>, users: Arc<dyn UserRepo>) -> Self {
        Self { books, users }
    }

    /// Inserts or replaces the caller's review of the book with this ibn.
    /// The book must already be cataloged.
    pub async fn add_or_update(
        &self,
        ibn: &str,
        user: Uuid,
        rating: i32,
        comment: String,
    ) -> Result<ReviewOutcome> {
        let mut book = self
            .books
            .get_by_ibn(ibn)
            .await?
            .ok_or_else(|| AppError::NotFound("book".into(), ibn.to_string()))?;

        let disposition = book.upsert_review(user, rating, comment);
        self.books.update(&book).await?;

        info!(%ibn, %user, ?disposition, avg = book.avg_rating, "review written");
        Ok(ReviewOutcome {
            avg_rating: book.avg_rating,
            disposition,
        })
    }

    /// All reviews of a book in stored order, reviewers resolved. An
    /// unknown ibn yields an empty list rather than an error.
    pub async fn list_for_book(&self, ibn: &str) -> Result<Vec<ReviewView>> {
        let Some(book) = self.books.get_by_ibn(ibn).await? else {
            return Ok(Vec::new());
        };

        let reviewer_ids: Vec<Uuid> = book.reviews.iter().map(|r| r.user_id).collect();
        let directory = UserDirectory::new(self.users.get_many(&reviewer_ids).await?);

        Ok(book
            .reviews
            .iter()
            .map(|r| ReviewView::assemble(r, &directory))
            .collect())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog entry. Reviews are embedded and owned by the book; the
/// running average is stored rather than computed on read so list views
/// never touch the review array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    /// External catalog key (ISBN-style), unique across the system
    pub ibn: String,
    pub title: String,
    pub author: String,
    pub language: String,
    pub cover_img: String,
    pub description: String,
    pub buy_url: String,
    pub year: Option<i32>,
    pub genre: Vec<String>,
    pub reviews: Vec<Review>,
    /// Arithmetic mean of all embedded ratings, 0.0 when there are none
    pub avg_rating: f64,
    /// The user who first cataloged this book, if known
    pub added_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One reader's take on a book. At most one per (book, user); a second
/// submission overwrites the first in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub date: DateTime<Utc>,
}

/// Whether an upsert created a fresh review or replaced an existing one.
/// Callers use this to phrase their response message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDisposition {
    Created,
    Updated,
}

impl Book {
    /// Inserts or replaces the caller's review and recomputes the average.
    ///
    /// An existing review keeps its position in the list; only rating,
    /// comment, and date change.
    pub fn upsert_review(
        &mut self,
        user_id: Uuid,
        rating: i32,
        comment: String,
    ) -> ReviewDisposition {
        let disposition = match self.reviews.iter_mut().find(|r| r.user_id == user_id) {
            Some(existing) => {
                existing.rating = rating;
                existing.comment = comment;
                existing.date = Utc::now();
                ReviewDisposition::Updated
            }
            None => {
                self.reviews.push(Review {
                    user_id,
                    rating,
                    comment,
                    date: Utc::now(),
                });
                ReviewDisposition::Created
            }
        };
        self.recompute_avg_rating();
        self.touch();
        disposition
    }

    fn recompute_avg_rating(&mut self) {
        if self.reviews.is_empty() {
            self.avg_rating = 0.0;
            return;
        }
        let total: i64 = self.reviews.iter().map(|r| i64::from(r.rating)).sum();
        self.avg_rating = total as f64 / self.reviews.len() as f64;
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

//! # Domain Models
//!
//! These structs represent the core entities of LumiRead and double as the
//! persisted document shape: each aggregate serializes to one JSON document.
//! We use UUID v7 for time-ordered, globally unique identification.

mod book;
mod club;
mod post;
mod user;

pub use book::{Book, Review, ReviewDisposition};
pub use club::{BookClub, Privacy};
pub use post::{ClubPost, Comment, Reply};
pub use user::{ReadingGoals, User};

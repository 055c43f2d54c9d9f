//! Route handlers, one module per surface.

pub mod auth;
pub mod books;
pub mod club_posts;
pub mod clubs;
pub mod reviews;
pub mod shelf;

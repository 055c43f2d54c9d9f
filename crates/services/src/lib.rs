//! lumiread/crates/services/src/lib.rs
//!
//! The engines behind every LumiRead operation. Each service owns the rules
//! for one slice of the product and talks to storage only through the ports
//! in `domains`, so the same engines run against Postgres in production and
//! the in-memory store in tests.

pub mod accounts;
pub mod catalog;
pub mod feed;
pub mod membership;
pub mod reviews;
pub mod shelf;
pub mod views;

pub use accounts::{AccountService, NewAccount};
pub use catalog::{CatalogService, NewBook};
pub use feed::{FeedService, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT};
pub use membership::{MembershipService, NewClub};
pub use reviews::{ReviewOutcome, ReviewService};
pub use shelf::ShelfService;
pub use views::{
    ClubDetail, ClubDirectoryEntry, ClubSummary, CommentView, FeedItemView, PostView, ProfileView,
    ReplyView, ReviewView, UserRef,
};

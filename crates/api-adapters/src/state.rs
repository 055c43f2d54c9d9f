//! Shared handler state.

use std::sync::Arc;

use domains::{TokenIssuer, UserRepo};
use services::{
    AccountService, CatalogService, FeedService, MembershipService, ReviewService, ShelfService,
};

use crate::metrics::HttpMetrics;

/// Everything the handlers need, cloned per request. Services are cheap
/// handle bundles, so a plain derive is enough.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub membership: MembershipService,
    pub feed: FeedService,
    pub reviews: ReviewService,
    pub catalog: CatalogService,
    pub shelf: ShelfService,
    /// Used by the bearer extractor to load the caller's account.
    pub users: Arc<dyn UserRepo>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub metrics: Arc<HttpMetrics>,
}

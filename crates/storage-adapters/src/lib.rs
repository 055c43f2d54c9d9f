//! # storage-adapters
//!
//! Concrete implementations of the `domains` persistence and media ports.
//!
//! - `MemoryStore` / `MemoryMediaStore`: DashMap-backed, always compiled,
//!   used by tests and the seed tool's dry-run mode.
//! - `PgStore` (feature `db-postgres`): Postgres as a document store, one
//!   JSONB document per aggregate row.
//! - `LocalMediaStore` (feature `media-local`): content-addressed files on
//!   the local disk.

pub mod media;
pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use media::MemoryMediaStore;
pub use memory::MemoryStore;

#[cfg(feature = "media-local")]
pub use media::LocalMediaStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;

//! lumiread/crates/domains/src/lib.rs
//!
//! The central domain logic and interface definitions for LumiRead.

pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn test_club_post_creation_v7() {
        let club_id = Uuid::now_v7();
        let author_id = Uuid::now_v7();
        let post = ClubPost::new(
            club_id,
            author_id,
            "Just finished chapter three".to_string(),
            vec!["spoilers".to_string()],
            None,
        );
        assert_eq!(post.club_id, club_id);
        assert!(post.likes.is_empty());
        assert!(post.comments.is_empty());
    }

    #[test]
    fn test_privacy_document_encoding() {
        let club = BookClub::new(
            "Slow Readers".to_string(),
            String::new(),
            String::new(),
            Privacy::Private,
            Uuid::now_v7(),
        );
        let doc = serde_json::to_value(&club).unwrap();
        assert_eq!(doc["privacy"], "private");
        assert_eq!(doc["members"].as_array().unwrap().len(), 1);
    }
}

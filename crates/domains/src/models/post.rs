use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// A message in a club's feed.
///
/// Comments (and their replies) are embedded and die with the post.
/// `likes` behaves as a set, toggled per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubPost {
    pub id: Uuid,
    pub club_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub tags: Vec<String>,
    /// Media id of an attached image, resolvable through MediaStorage
    pub image: Option<String>,
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A top-level comment on a post. Append-only; replies nest one level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
}

/// A reply to a comment. The nesting stops here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ClubPost {
    pub fn new(
        club_id: Uuid,
        author_id: Uuid,
        content: String,
        tags: Vec<String>,
        image: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            club_id,
            author_id,
            content,
            tags,
            image,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_liked_by(&self, user: Uuid) -> bool {
        self.likes.contains(&user)
    }

    /// Flips the user's like and returns the resulting like count.
    /// Applying it twice restores the original state.
    pub fn toggle_like(&mut self, user: Uuid) -> usize {
        if let Some(pos) = self.likes.iter().position(|u| *u == user) {
            self.likes.remove(pos);
        } else {
            self.likes.push(user);
        }
        self.touch();
        self.likes.len()
    }

    /// Appends a comment and returns its id for later reply targeting.
    pub fn add_comment(&mut self, author_id: Uuid, text: String) -> Uuid {
        let comment = Comment {
            id: Uuid::now_v7(),
            author_id,
            text,
            replies: Vec::new(),
            created_at: Utc::now(),
        };
        let id = comment.id;
        self.comments.push(comment);
        self.touch();
        id
    }

    /// Appends a reply under the addressed comment. The comment list is
    /// left untouched when the target does not exist.
    pub fn add_reply(&mut self, comment_id: Uuid, author_id: Uuid, text: String) -> Result<()> {
        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| AppError::NotFound("comment".into(), comment_id.to_string()))?;
        comment.replies.push(Reply {
            author_id,
            text,
            created_at: Utc::now(),
        });
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

//! Response projections.
//!
//! These are the wire shapes the web client actually renders: aggregates
//! with user ids resolved to display refs, counts precomputed, and field
//! names matching what the client expects. Club-side views use camelCase;
//! book and review views keep the catalog's snake_case fields.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use domains::{BookClub, ClubPost, Comment, Privacy, Reply, Review, User};
use serde::Serialize;
use uuid::Uuid;

/// Minimal display reference to a user, embedded wherever an aggregate
/// points at one.
#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub avatar: String,
}

impl UserRef {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }

    /// Placeholder for authors whose account no longer resolves. The
    /// original id is kept so clients can still key on it.
    pub fn anonymous(id: Uuid) -> Self {
        Self {
            id,
            name: "Anonymous".into(),
            username: String::new(),
            avatar: String::new(),
        }
    }
}

/// Lookup table for turning author ids into display refs.
pub(crate) struct UserDirectory(HashMap<Uuid, UserRef>);

impl UserDirectory {
    pub(crate) fn new(users: Vec<User>) -> Self {
        Self(
            users
                .iter()
                .map(|u| (u.id, UserRef::from_user(u)))
                .collect(),
        )
    }

    pub(crate) fn resolve(&self, id: Uuid) -> UserRef {
        self.0
            .get(&id)
            .cloned()
            .unwrap_or_else(|| UserRef::anonymous(id))
    }
}

/// One row of "my clubs".
#[derive(Debug, Clone, Serialize)]
pub struct ClubSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    #[serde(rename = "memberCount")]
    pub member_count: usize,
}

impl ClubSummary {
    pub fn from_club(club: &BookClub) -> Self {
        Self {
            id: club.id,
            name: club.name.clone(),
            avatar: club.avatar.clone(),
            member_count: club.member_count(),
        }
    }
}

/// One row of the all-clubs directory, relative to the viewing user.
#[derive(Debug, Clone, Serialize)]
pub struct ClubDirectoryEntry {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub privacy: Privacy,
    #[serde(rename = "memberCount")]
    pub member_count: usize,
    #[serde(rename = "isMember")]
    pub is_member: bool,
    #[serde(rename = "isInvited")]
    pub is_invited: bool,
}

impl ClubDirectoryEntry {
    pub fn for_viewer(club: &BookClub, viewer: Uuid) -> Self {
        Self {
            id: club.id,
            name: club.name.clone(),
            avatar: club.avatar.clone(),
            privacy: club.privacy,
            member_count: club.member_count(),
            is_member: club.is_member(viewer),
            is_invited: club.is_invited(viewer),
        }
    }
}

/// Full club page: everything resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ClubDetail {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub avatar: String,
    pub privacy: Privacy,
    pub admin: UserRef,
    pub members: Vec<UserRef>,
    #[serde(rename = "invitedMembers")]
    pub invited_members: Vec<UserRef>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A feed post with authors resolved down through the reply level.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: Uuid,
    #[serde(rename = "clubId")]
    pub club_id: Uuid,
    pub author: UserRef,
    pub content: String,
    pub tags: Vec<String>,
    /// Public URL of the attached image, when any
    pub image: Option<String>,
    pub likes: Vec<Uuid>,
    #[serde(rename = "likeCount")]
    pub like_count: usize,
    pub comments: Vec<CommentView>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub author: UserRef,
    pub text: String,
    pub replies: Vec<ReplyView>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyView {
    pub author: UserRef,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl PostView {
    pub(crate) fn assemble(
        post: &ClubPost,
        directory: &UserDirectory,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id: post.id,
            club_id: post.club_id,
            author: directory.resolve(post.author_id),
            content: post.content.clone(),
            tags: post.tags.clone(),
            image: image_url,
            likes: post.likes.clone(),
            like_count: post.likes.len(),
            comments: post
                .comments
                .iter()
                .map(|c| CommentView::assemble(c, directory))
                .collect(),
            created_at: post.created_at,
        }
    }
}

impl CommentView {
    fn assemble(comment: &Comment, directory: &UserDirectory) -> Self {
        Self {
            id: comment.id,
            author: directory.resolve(comment.author_id),
            text: comment.text.clone(),
            replies: comment
                .replies
                .iter()
                .map(|r| ReplyView::assemble(r, directory))
                .collect(),
            created_at: comment.created_at,
        }
    }
}

impl ReplyView {
    fn assemble(reply: &Reply, directory: &UserDirectory) -> Self {
        Self {
            author: directory.resolve(reply.author_id),
            text: reply.text.clone(),
            created_at: reply.created_at,
        }
    }
}

/// One entry of the cross-club home feed digest.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItemView {
    pub id: Uuid,
    #[serde(rename = "clubId")]
    pub club_id: Uuid,
    #[serde(rename = "clubName")]
    pub club_name: String,
    pub author: UserRef,
    pub content: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: usize,
    #[serde(rename = "commentCount")]
    pub comment_count: usize,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A review with the reviewer resolved; field names match the stored
/// review shape the client already parses.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub user: UserRef,
    pub rating: i32,
    pub comment: String,
    pub date: DateTime<Utc>,
}

impl ReviewView {
    pub(crate) fn assemble(review: &Review, directory: &UserDirectory) -> Self {
        Self {
            user: directory.resolve(review.user_id),
            rating: review.rating,
            comment: review.comment.clone(),
            date: review.date,
        }
    }
}

/// The signed-in user's own profile (never exposes the password hash).
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub bio: Option<String>,
    pub age: Option<i32>,
    #[serde(rename = "readingGoals")]
    pub reading_goals: ReadingGoalsView,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadingGoalsView {
    pub year: i32,
    pub completed: i32,
    #[serde(rename = "pagesRead")]
    pub pages_read: i64,
}

impl ProfileView {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            bio: user.bio.clone(),
            age: user.age,
            reading_goals: ReadingGoalsView {
                year: user.reading_goals.year,
                completed: user.reading_goals.completed,
                pages_read: user.reading_goals.pages_read,
            },
        }
    }
}

//! # Social feed engine
//!
//! Club posts with embedded comments, one level of replies, and per-user
//! like toggling. Post creation deliberately checks neither club existence
//! nor membership; the club id is a weak reference and the client is
//! trusted to post where it belongs. Deletion is author-only.

use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use domains::{
    AppError, ClubPost, ClubPostRepo, ClubRepo, Comment, MediaStorage, Reply, Result, User,
    UserRepo,
};
use mime::Mime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::views::{FeedItemView, PostView, UserDirectory};

/// Home feed size when the client sends no limit.
pub const DEFAULT_FEED_LIMIT: i64 = 5;
/// Upper bound on a client-requested feed size.
pub const MAX_FEED_LIMIT: i64 = 50;

/// Splits the client's comma-separated tag string. Tags are trimmed and
/// empty segments dropped; duplicates and casing pass through untouched.
pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn ClubPostRepo>,
    clubs: Arc<dyn ClubRepo>,
    users: Arc<dyn UserRepo>,
    media: Arc<dyn MediaStorage>,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn ClubPostRepo>,
        clubs: Arc<dyn ClubRepo>,
        users: Arc<dyn UserRepo>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            posts,
            clubs,
            users,
            media,
        }
    }

    async fn require_post(&self, id: Uuid) -> Result<ClubPost> {
        self.posts
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("post".into(), id.to_string()))
    }

    /// Creates a post, storing the attached image first when one is sent.
    pub async fn create_post(
        &self,
        club_id: Uuid,
        author: Uuid,
        content: String,
        tags_raw: Option<String>,
        image: Option<(Bytes, Mime)>,
    ) -> Result<ClubPost> {
        if content.trim().is_empty() {
            return Err(AppError::ValidationError("post content is required".into()));
        }

        let image_id = match image {
            Some((data, content_type)) => Some(self.media.save(data, content_type).await?),
            None => None,
        };

        let post = ClubPost::new(
            club_id,
            author,
            content,
            split_tags(tags_raw.as_deref()),
            image_id,
        );
        self.posts.insert(&post).await?;
        info!(post = %post.id, club = %club_id, %author, "post created");
        Ok(post)
    }

    /// Projects a single post when its author is already in hand, as right
    /// after creation.
    pub fn view_of(&self, post: &ClubPost, author: &User) -> PostView {
        let directory = UserDirectory::new(vec![author.clone()]);
        PostView::assemble(post, &directory, self.image_url(post))
    }

    /// All posts of a club, newest first, authors resolved down to replies.
    /// An unknown club simply has no posts.
    pub async fn list_posts(&self, club_id: Uuid) -> Result<Vec<PostView>> {
        let posts = self.posts.list_for_club(club_id).await?;
        let directory = self.author_directory(&posts).await?;
        Ok(posts
            .iter()
            .map(|p| PostView::assemble(p, &directory, self.image_url(p)))
            .collect())
    }

    /// Flips the caller's like and returns the resulting count.
    pub async fn toggle_like(&self, post_id: Uuid, user: Uuid) -> Result<usize> {
        let mut post = self.require_post(post_id).await?;
        let count = post.toggle_like(user);
        self.posts.update(&post).await?;
        Ok(count)
    }

    /// Appends a comment and returns the post's full comment list.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author: Uuid,
        text: String,
    ) -> Result<Vec<Comment>> {
        if text.trim().is_empty() {
            return Err(AppError::ValidationError("comment text is required".into()));
        }
        let mut post = self.require_post(post_id).await?;
        post.add_comment(author, text);
        self.posts.update(&post).await?;
        Ok(post.comments)
    }

    /// Appends a reply under a comment and returns that comment's replies.
    pub async fn add_reply(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        author: Uuid,
        text: String,
    ) -> Result<Vec<Reply>> {
        if text.trim().is_empty() {
            return Err(AppError::ValidationError("reply text is required".into()));
        }
        let mut post = self.require_post(post_id).await?;
        post.add_reply(comment_id, author, text)?;
        self.posts.update(&post).await?;

        let replies = post
            .comments
            .into_iter()
            .find(|c| c.id == comment_id)
            .map(|c| c.replies)
            .unwrap_or_default();
        Ok(replies)
    }

    /// Author-only deletion. Images are content-addressed, so the stored
    /// object is removed only once no other post references it; cleanup is
    /// best-effort and a media failure still lets the deletion succeed.
    pub async fn delete_post(&self, post_id: Uuid, requester: Uuid) -> Result<()> {
        let post = self.require_post(post_id).await?;
        if post.author_id != requester {
            return Err(AppError::Forbidden(
                "only the author can delete this post".into(),
            ));
        }

        self.posts.delete(post_id).await?;

        if let Some(media_id) = &post.image {
            match self.posts.any_with_image(media_id).await {
                Ok(true) => {}
                Ok(false) => {
                    if let Err(e) = self.media.delete(media_id).await {
                        warn!(
                            post = %post_id,
                            media = %media_id,
                            error = %e,
                            "orphaned post image not removed"
                        );
                    }
                }
                Err(e) => {
                    warn!(
                        post = %post_id,
                        media = %media_id,
                        error = %e,
                        "image reference lookup failed, keeping the stored object"
                    );
                }
            }
        }
        info!(post = %post_id, "post deleted");
        Ok(())
    }

    /// The home digest: the newest posts across all clubs the user belongs
    /// to. `limit` defaults to [`DEFAULT_FEED_LIMIT`] and is clamped.
    pub async fn feed_for_user(&self, user: Uuid, limit: Option<i64>) -> Result<Vec<FeedItemView>> {
        let limit = limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, MAX_FEED_LIMIT);

        let clubs = self.clubs.list_for_member(user).await?;
        if clubs.is_empty() {
            return Ok(Vec::new());
        }

        let club_ids: Vec<Uuid> = clubs.iter().map(|c| c.id).collect();
        let posts = self.posts.list_recent_for_clubs(&club_ids, limit).await?;

        let author_ids: Vec<Uuid> = dedupe(posts.iter().map(|p| p.author_id));
        let directory = UserDirectory::new(self.users.get_many(&author_ids).await?);

        Ok(posts
            .iter()
            .map(|p| FeedItemView {
                id: p.id,
                club_id: p.club_id,
                club_name: clubs
                    .iter()
                    .find(|c| c.id == p.club_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                author: directory.resolve(p.author_id),
                content: p.content.clone(),
                tags: p.tags.clone(),
                image: self.image_url(p),
                like_count: p.likes.len(),
                comment_count: p.comments.len(),
                created_at: p.created_at,
            })
            .collect())
    }

    fn image_url(&self, post: &ClubPost) -> Option<String> {
        post.image.as_deref().map(|id| self.media.public_url(id))
    }

    /// Collects every author appearing in the posts (posts, comments,
    /// replies) and resolves them in one batch.
    async fn author_directory(&self, posts: &[ClubPost]) -> Result<UserDirectory> {
        let mut ids = Vec::new();
        for post in posts {
            ids.push(post.author_id);
            for comment in &post.comments {
                ids.push(comment.author_id);
                ids.extend(comment.replies.iter().map(|r| r.author_id));
            }
        }
        let ids = dedupe(ids.into_iter());
        Ok(UserDirectory::new(self.users.get_many(&ids).await?))
    }
}

fn dedupe(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockClubPostRepo, MockClubRepo, MockMediaStorage, MockUserRepo};

    #[test]
    fn split_tags_trims_and_drops_empties() {
        assert_eq!(
            split_tags(Some("fantasy, sci-fi ,, spoilers ")),
            vec!["fantasy", "sci-fi", "spoilers"]
        );
        assert_eq!(split_tags(Some("  ,  ")), Vec::<String>::new());
        assert_eq!(split_tags(None), Vec::<String>::new());
    }

    #[test]
    fn split_tags_keeps_duplicates_and_case() {
        assert_eq!(split_tags(Some("Tag,tag,TAG")), vec!["Tag", "tag", "TAG"]);
    }

    fn service(posts: MockClubPostRepo, media: MockMediaStorage) -> FeedService {
        FeedService::new(
            Arc::new(posts),
            Arc::new(MockClubRepo::new()),
            Arc::new(MockUserRepo::new()),
            Arc::new(media),
        )
    }

    #[tokio::test]
    async fn posts_need_content() {
        let svc = service(MockClubPostRepo::new(), MockMediaStorage::new());
        let err = svc
            .create_post(Uuid::now_v7(), Uuid::now_v7(), "  \n ".into(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn creation_skips_club_and_membership_checks() {
        // The club reference is weak on purpose: no lookup happens at all.
        let mut posts = MockClubPostRepo::new();
        posts.expect_insert().returning(|_| Ok(()));

        let svc = service(posts, MockMediaStorage::new());
        let post = svc
            .create_post(Uuid::now_v7(), Uuid::now_v7(), "hello".into(), Some("a,b".into()), None)
            .await
            .unwrap();
        assert_eq!(post.tags, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn delete_survives_a_failing_media_store() {
        let author = Uuid::now_v7();
        let post = ClubPost::new(
            Uuid::now_v7(),
            author,
            "x".into(),
            vec![],
            Some("aabbcc.png".into()),
        );
        let post_id = post.id;

        let mut posts = MockClubPostRepo::new();
        posts
            .expect_get()
            .returning(move |_| Ok(Some(post.clone())));
        posts.expect_delete().returning(|_| Ok(()));
        posts.expect_any_with_image().returning(|_| Ok(false));

        let mut media = MockMediaStorage::new();
        media
            .expect_delete()
            .returning(|_| Err(AppError::Internal("disk on fire".into())));

        let svc = service(posts, media);
        svc.delete_post(post_id, author).await.unwrap();
    }

    #[tokio::test]
    async fn delete_keeps_an_image_another_post_still_uses() {
        let author = Uuid::now_v7();
        let post = ClubPost::new(
            Uuid::now_v7(),
            author,
            "x".into(),
            vec![],
            Some("aabbcc.png".into()),
        );
        let post_id = post.id;

        let mut posts = MockClubPostRepo::new();
        posts
            .expect_get()
            .returning(move |_| Ok(Some(post.clone())));
        posts.expect_delete().returning(|_| Ok(()));
        posts.expect_any_with_image().returning(|_| Ok(true));
        // No expect_delete on media: touching the shared object would panic
        // the mock.
        let svc = service(posts, MockMediaStorage::new());
        svc.delete_post(post_id, author).await.unwrap();
    }

    #[tokio::test]
    async fn only_the_author_deletes() {
        let post = ClubPost::new(Uuid::now_v7(), Uuid::now_v7(), "x".into(), vec![], None);
        let post_id = post.id;

        let mut posts = MockClubPostRepo::new();
        posts
            .expect_get()
            .returning(move |_| Ok(Some(post.clone())));

        let svc = service(posts, MockMediaStorage::new());
        let err = svc.delete_post(post_id, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn reply_to_a_missing_comment_is_not_found_and_saves_nothing() {
        let post = ClubPost::new(Uuid::now_v7(), Uuid::now_v7(), "x".into(), vec![], None);
        let post_id = post.id;

        let mut posts = MockClubPostRepo::new();
        posts
            .expect_get()
            .returning(move |_| Ok(Some(post.clone())));
        // No expect_update: a save would panic the mock.

        let svc = service(posts, MockMediaStorage::new());
        let err = svc
            .add_reply(post_id, Uuid::now_v7(), Uuid::now_v7(), "hi".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_, _)));
    }

    #[tokio::test]
    async fn feed_is_empty_without_memberships() {
        let mut clubs = MockClubRepo::new();
        clubs.expect_list_for_member().returning(|_| Ok(vec![]));

        let svc = FeedService::new(
            Arc::new(MockClubPostRepo::new()),
            Arc::new(clubs),
            Arc::new(MockUserRepo::new()),
            Arc::new(MockMediaStorage::new()),
        );
        let feed = svc.feed_for_user(Uuid::now_v7(), None).await.unwrap();
        assert!(feed.is_empty());
    }
}

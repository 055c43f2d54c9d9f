//! DashMap-backed implementation of the persistence ports.
//!
//! Mirrors the document-store semantics of `PgStore`: whole-document
//! replacement on update, uniqueness checks on insert. Backs the test
//! suites and the seed tool's dry-run mode.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{
    AppError, Book, BookClub, BookRepo, ClubPost, ClubPostRepo, ClubRepo, Result, User, UserRepo,
};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    books: DashMap<Uuid, Book>,
    clubs: DashMap<Uuid, BookClub>,
    posts: DashMap<Uuid, ClubPost>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn insert(&self, user: &User) -> Result<()> {
        let username_taken = self.users.iter().any(|u| u.username == user.username);
        if username_taken {
            return Err(AppError::Conflict("username already exists".into()));
        }
        let email_taken = self.users.iter().any(|u| u.email == user.email);
        if email_taken {
            return Err(AppError::Conflict("email already exists".into()));
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.clone()))
            .collect())
    }

    async fn update(&self, user: &User) -> Result<()> {
        if !self.users.contains_key(&user.id) {
            return Err(AppError::NotFound("user".into(), user.id.to_string()));
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl BookRepo for MemoryStore {
    async fn insert(&self, book: &Book) -> Result<()> {
        let ibn_taken = self.books.iter().any(|b| b.ibn == book.ibn);
        if ibn_taken {
            return Err(AppError::Conflict("book ibn already exists".into()));
        }
        self.books.insert(book.id, book.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Book>> {
        Ok(self.books.get(&id).map(|b| b.clone()))
    }

    async fn get_by_ibn(&self, ibn: &str) -> Result<Option<Book>> {
        Ok(self.books.iter().find(|b| b.ibn == ibn).map(|b| b.clone()))
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Book>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.books.get(id).map(|b| b.clone()))
            .collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Book>> {
        let needle = query.to_lowercase();
        let mut found: Vec<Book> = self
            .books
            .iter()
            .filter(|b| {
                b.title.to_lowercase().contains(&needle)
                    || b.author.to_lowercase().contains(&needle)
            })
            .map(|b| b.clone())
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn update(&self, book: &Book) -> Result<()> {
        if !self.books.contains_key(&book.id) {
            return Err(AppError::NotFound("book".into(), book.id.to_string()));
        }
        self.books.insert(book.id, book.clone());
        Ok(())
    }
}

#[async_trait]
impl ClubRepo for MemoryStore {
    async fn insert(&self, club: &BookClub) -> Result<()> {
        self.clubs.insert(club.id, club.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<BookClub>> {
        Ok(self.clubs.get(&id).map(|c| c.clone()))
    }

    async fn list_all(&self) -> Result<Vec<BookClub>> {
        let mut all: Vec<BookClub> = self.clubs.iter().map(|c| c.clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn list_for_member(&self, user: Uuid) -> Result<Vec<BookClub>> {
        let mut clubs: Vec<BookClub> = self
            .clubs
            .iter()
            .filter(|c| c.is_member(user))
            .map(|c| c.clone())
            .collect();
        clubs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(clubs)
    }

    async fn update(&self, club: &BookClub) -> Result<()> {
        if !self.clubs.contains_key(&club.id) {
            return Err(AppError::NotFound("club".into(), club.id.to_string()));
        }
        self.clubs.insert(club.id, club.clone());
        Ok(())
    }
}

#[async_trait]
impl ClubPostRepo for MemoryStore {
    async fn insert(&self, post: &ClubPost) -> Result<()> {
        self.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ClubPost>> {
        Ok(self.posts.get(&id).map(|p| p.clone()))
    }

    async fn list_for_club(&self, club: Uuid) -> Result<Vec<ClubPost>> {
        let mut posts: Vec<ClubPost> = self
            .posts
            .iter()
            .filter(|p| p.club_id == club)
            .map(|p| p.clone())
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn list_recent_for_clubs(&self, clubs: &[Uuid], limit: i64) -> Result<Vec<ClubPost>> {
        let mut posts: Vec<ClubPost> = self
            .posts
            .iter()
            .filter(|p| clubs.contains(&p.club_id))
            .map(|p| p.clone())
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts.truncate(limit.max(0) as usize);
        Ok(posts)
    }

    async fn any_with_image(&self, media_id: &str) -> Result<bool> {
        Ok(self.posts.iter().any(|p| p.image.as_deref() == Some(media_id)))
    }

    async fn update(&self, post: &ClubPost) -> Result<()> {
        if !self.posts.contains_key(&post.id) {
            return Err(AppError::NotFound("post".into(), post.id.to_string()));
        }
        self.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.posts
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("post".into(), id.to_string()))?;
        Ok(())
    }
}

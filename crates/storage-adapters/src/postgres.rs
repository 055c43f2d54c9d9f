//! # PgStore
//!
//! Postgres as a document store. Each aggregate serializes into a JSONB
//! `doc` column; the handful of scalar columns beside it exist only for
//! lookups and uniqueness (username, email, ibn, club_id). Updates replace
//! the whole document, so the last writer wins, exactly like the memory
//! adapter.

use async_trait::async_trait;
use domains::{
    AppError, Book, BookClub, BookRepo, ClubPost, ClubPostRepo, ClubRepo, Result, User, UserRepo,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and brings the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool; the caller owns migrations.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn internal(e: sqlx::Error) -> AppError {
    AppError::Internal(format!("database error: {e}"))
}

/// Insert-path error mapping: unique-index violations become Conflicts,
/// everything else is infrastructure.
fn on_insert(e: sqlx::Error, what: &str) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::Conflict(format!("{what} already exists"));
        }
    }
    internal(e)
}

#[async_trait]
impl UserRepo for PgStore {
    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, created_at, doc) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.created_at)
        .bind(Json(user))
        .execute(&self.pool)
        .await
        .map_err(|e| on_insert(e, "username or email"))?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT doc FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(|r| r.get::<Json<User>, _>("doc").0))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT doc FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(|r| r.get::<Json<User>, _>("doc").0))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT doc FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(|r| r.get::<Json<User>, _>("doc").0))
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT doc FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        Ok(rows
            .into_iter()
            .map(|r| r.get::<Json<User>, _>("doc").0)
            .collect())
    }

    async fn update(&self, user: &User) -> Result<()> {
        let res = sqlx::query("UPDATE users SET doc = $2, username = $3, email = $4 WHERE id = $1")
            .bind(user.id)
            .bind(Json(user))
            .bind(&user.username)
            .bind(&user.email)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("user".into(), user.id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookRepo for PgStore {
    async fn insert(&self, book: &Book) -> Result<()> {
        sqlx::query("INSERT INTO books (id, ibn, created_at, doc) VALUES ($1, $2, $3, $4)")
            .bind(book.id)
            .bind(&book.ibn)
            .bind(book.created_at)
            .bind(Json(book))
            .execute(&self.pool)
            .await
            .map_err(|e| on_insert(e, "book ibn"))?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Book>> {
        let row = sqlx::query("SELECT doc FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(|r| r.get::<Json<Book>, _>("doc").0))
    }

    async fn get_by_ibn(&self, ibn: &str) -> Result<Option<Book>> {
        let row = sqlx::query("SELECT doc FROM books WHERE ibn = $1")
            .bind(ibn)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(|r| r.get::<Json<Book>, _>("doc").0))
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Book>> {
        let rows = sqlx::query("SELECT doc FROM books WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        Ok(rows
            .into_iter()
            .map(|r| r.get::<Json<Book>, _>("doc").0)
            .collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            "SELECT doc FROM books \
             WHERE doc->>'title' ILIKE '%' || $1 || '%' \
                OR doc->>'author' ILIKE '%' || $1 || '%' \
             ORDER BY created_at, id",
        )
        .bind(query)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        Ok(rows
            .into_iter()
            .map(|r| r.get::<Json<Book>, _>("doc").0)
            .collect())
    }

    async fn update(&self, book: &Book) -> Result<()> {
        let res = sqlx::query("UPDATE books SET doc = $2 WHERE id = $1")
            .bind(book.id)
            .bind(Json(book))
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("book".into(), book.id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ClubRepo for PgStore {
    async fn insert(&self, club: &BookClub) -> Result<()> {
        sqlx::query("INSERT INTO book_clubs (id, created_at, doc) VALUES ($1, $2, $3)")
            .bind(club.id)
            .bind(club.created_at)
            .bind(Json(club))
            .execute(&self.pool)
            .await
            .map_err(|e| on_insert(e, "club"))?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<BookClub>> {
        let row = sqlx::query("SELECT doc FROM book_clubs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(|r| r.get::<Json<BookClub>, _>("doc").0))
    }

    async fn list_all(&self) -> Result<Vec<BookClub>> {
        let rows = sqlx::query("SELECT doc FROM book_clubs ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        Ok(rows
            .into_iter()
            .map(|r| r.get::<Json<BookClub>, _>("doc").0)
            .collect())
    }

    async fn list_for_member(&self, user: Uuid) -> Result<Vec<BookClub>> {
        // Membership lives inside the document; the GIN index on
        // doc->'members' keeps this containment probe cheap.
        let rows = sqlx::query(
            "SELECT doc FROM book_clubs \
             WHERE doc->'members' @> to_jsonb($1::uuid) \
             ORDER BY created_at, id",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        Ok(rows
            .into_iter()
            .map(|r| r.get::<Json<BookClub>, _>("doc").0)
            .collect())
    }

    async fn update(&self, club: &BookClub) -> Result<()> {
        let res = sqlx::query("UPDATE book_clubs SET doc = $2 WHERE id = $1")
            .bind(club.id)
            .bind(Json(club))
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("club".into(), club.id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ClubPostRepo for PgStore {
    async fn insert(&self, post: &ClubPost) -> Result<()> {
        sqlx::query("INSERT INTO club_posts (id, club_id, created_at, doc) VALUES ($1, $2, $3, $4)")
            .bind(post.id)
            .bind(post.club_id)
            .bind(post.created_at)
            .bind(Json(post))
            .execute(&self.pool)
            .await
            .map_err(|e| on_insert(e, "post"))?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ClubPost>> {
        let row = sqlx::query("SELECT doc FROM club_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(|r| r.get::<Json<ClubPost>, _>("doc").0))
    }

    async fn list_for_club(&self, club: Uuid) -> Result<Vec<ClubPost>> {
        let rows = sqlx::query(
            "SELECT doc FROM club_posts WHERE club_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(club)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        Ok(rows
            .into_iter()
            .map(|r| r.get::<Json<ClubPost>, _>("doc").0)
            .collect())
    }

    async fn list_recent_for_clubs(&self, clubs: &[Uuid], limit: i64) -> Result<Vec<ClubPost>> {
        let rows = sqlx::query(
            "SELECT doc FROM club_posts WHERE club_id = ANY($1) \
             ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(clubs)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        Ok(rows
            .into_iter()
            .map(|r| r.get::<Json<ClubPost>, _>("doc").0)
            .collect())
    }

    async fn any_with_image(&self, media_id: &str) -> Result<bool> {
        let row =
            sqlx::query("SELECT EXISTS(SELECT 1 FROM club_posts WHERE doc->>'image' = $1) AS hit")
                .bind(media_id)
                .fetch_one(&self.pool)
                .await
                .map_err(internal)?;
        Ok(row.get::<bool, _>("hit"))
    }

    async fn update(&self, post: &ClubPost) -> Result<()> {
        let res = sqlx::query("UPDATE club_posts SET doc = $2 WHERE id = $1")
            .bind(post.id)
            .bind(Json(post))
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("post".into(), post.id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM club_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("post".into(), id.to_string()));
        }
        Ok(())
    }
}

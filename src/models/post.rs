// src/models/post.rs

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

/// Represents the 'posts' table. Every lookup is scoped by the owning
/// account id; a post is never resolvable cross-account.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: String,

    /// Owner, immutable after creation.
    pub account_id: String,

    /// Unique within the account, lowercase `[0-9a-z-]`.
    pub slug: String,

    pub title: Option<String>,

    /// Raw markdown.
    pub content: Option<String>,

    /// Null means draft. Set exactly once; there is no unpublish.
    pub published_at: Option<DateTime<Utc>>,

    /// Non-null means soft-deleted. Terminal: the row stays to keep the slug
    /// reserved but behaves as not-found everywhere.
    pub deleted_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

/// Lifecycle state, derived from the two nullable timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostState {
    Draft,
    Published,
    Deleted,
}

impl Post {
    pub fn state(&self) -> PostState {
        if self.deleted_at.is_some() {
            PostState::Deleted
        } else if self.published_at.is_some() {
            PostState::Published
        } else {
            PostState::Draft
        }
    }

    /// Visible on the public tenant site: published only.
    pub fn publicly_visible(&self) -> bool {
        self.state() == PostState::Published
    }

    /// Visible in the owner dashboard: anything not deleted.
    pub fn dashboard_visible(&self) -> bool {
        self.state() != PostState::Deleted
    }

    /// Atomic create-or-detect-collision on the `(account_id, slug)` unique
    /// index. Returns the row plus whether this call created it; on
    /// collision the pre-existing row comes back unmodified.
    pub async fn create_if_slug_free(
        pool: &SqlitePool,
        account_id: &str,
        slug: &str,
    ) -> sqlx::Result<(Post, bool)> {
        let id = Uuid::new_v4().to_string();
        let post: Post = sqlx::query_as(
            "INSERT INTO posts (id, account_id, slug, created_at) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (account_id, slug) DO UPDATE SET slug = slug \
             RETURNING *",
        )
        .bind(&id)
        .bind(account_id)
        .bind(slug)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        let created = post.id == id;
        Ok((post, created))
    }

    pub async fn find_by_slug(
        pool: &SqlitePool,
        account_id: &str,
        slug: &str,
    ) -> sqlx::Result<Option<Post>> {
        sqlx::query_as("SELECT * FROM posts WHERE account_id = ?1 AND slug = ?2")
            .bind(account_id)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Published, not deleted, most recent first. Feeds the public listing
    /// and feed.xml.
    pub async fn list_published(pool: &SqlitePool, account_id: &str) -> sqlx::Result<Vec<Post>> {
        sqlx::query_as(
            "SELECT * FROM posts \
             WHERE account_id = ?1 AND published_at IS NOT NULL AND deleted_at IS NULL \
             ORDER BY published_at DESC \
             LIMIT 50",
        )
        .bind(account_id)
        .fetch_all(pool)
        .await
    }

    /// Everything not deleted, newest first, for the owner dashboard.
    pub async fn list_for_dashboard(
        pool: &SqlitePool,
        account_id: &str,
    ) -> sqlx::Result<Vec<Post>> {
        sqlx::query_as(
            "SELECT * FROM posts \
             WHERE account_id = ?1 AND deleted_at IS NULL \
             ORDER BY created_at DESC \
             LIMIT 100",
        )
        .bind(account_id)
        .fetch_all(pool)
        .await
    }

    /// Partial content update; `None` clears the field (empty form inputs
    /// are normalized to unset before this point).
    pub async fn update_content(
        pool: &SqlitePool,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> sqlx::Result<()> {
        sqlx::query("UPDATE posts SET title = ?2, content = ?3 WHERE id = ?1")
            .bind(id)
            .bind(title)
            .bind(content)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// One-way Draft -> Published transition. Callers check the current
    /// state first; a second publish is answered with a redirect upstream.
    pub async fn publish(pool: &SqlitePool, id: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE posts SET published_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Terminal transition from either live state. The slug stays reserved.
    pub async fn soft_delete(pool: &SqlitePool, id: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE posts SET deleted_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(pool)
            .await?;
        Ok(())
    }
}

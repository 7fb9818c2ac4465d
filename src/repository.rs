use crate::models::{CreatePostRequest, Post, PostStatus, UpdatePostRequest};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;

/// RepoError
///
/// `NotFound` is a normal outcome (missing slug or id); `Storage` is an engine failure and has
/// already been logged with its operation and identifier when the caller sees it.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("post not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// PostRepository
///
/// The only writer of post state. Each method is a single SQL statement; the engine's own
/// locking is the only concurrency control.
///
/// **Send + Sync + async_trait** make `Arc<dyn PostRepository>` shareable across handlers.
#[async_trait]
pub trait PostRepository: Send + Sync {
    // --- Public reads: status = published AND visible ---
    async fn list_published(&self) -> Result<Vec<Post>, RepoError>;
    // A draft or hidden post is reported exactly like a missing slug.
    async fn get_by_slug(&self, slug: &str) -> Result<Post, RepoError>;

    // --- Admin reads ---
    // Every post that list_published does not return, newest first.
    async fn list_drafts(&self) -> Result<Vec<Post>, RepoError>;
    async fn get_post(&self, id: i64) -> Result<Post, RepoError>;

    // --- Admin writes ---
    // Always persists a hidden draft, whatever the caller intended.
    async fn create_post(&self, req: CreatePostRequest) -> Result<Post, RepoError>;
    async fn update_post(&self, id: i64, req: UpdatePostRequest) -> Result<Post, RepoError>;
    async fn delete_post(&self, id: i64) -> Result<(), RepoError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn PostRepository>;

/// SqliteRepository
///
/// `PostRepository` over the `posts` table in SQLite.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for SqliteRepository {
    /// list_published
    ///
    /// Newest first; ties on `created_at` fall back to the higher id.
    async fn list_published(&self) -> Result<Vec<Post>, RepoError> {
        sqlx::query_as::<_, Post>(
            r#"SELECT id, title, slug, content, status, visible, created_at, updated_at
               FROM posts
               WHERE status = 'published' AND visible = TRUE
               ORDER BY created_at DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(operation = "list_published", error = %e, "post storage failure");
            RepoError::Storage(e)
        })
    }

    /// get_by_slug
    ///
    /// Slugs are not unique, so the newest public match wins.
    async fn get_by_slug(&self, slug: &str) -> Result<Post, RepoError> {
        sqlx::query_as::<_, Post>(
            r#"SELECT id, title, slug, content, status, visible, created_at, updated_at
               FROM posts
               WHERE slug = ? AND status = 'published' AND visible = TRUE
               ORDER BY created_at DESC, id DESC
               LIMIT 1"#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(operation = "get_by_slug", slug, error = %e, "post storage failure");
            RepoError::Storage(e)
        })?
        .ok_or(RepoError::NotFound)
    }

    /// list_drafts
    ///
    /// The complement of `list_published`: drafts, hidden published posts and visible drafts
    /// all land here, so together the two listings cover every row.
    async fn list_drafts(&self) -> Result<Vec<Post>, RepoError> {
        sqlx::query_as::<_, Post>(
            r#"SELECT id, title, slug, content, status, visible, created_at, updated_at
               FROM posts
               WHERE NOT (status = 'published' AND visible = TRUE)
               ORDER BY created_at DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(operation = "list_drafts", error = %e, "post storage failure");
            RepoError::Storage(e)
        })
    }

    async fn get_post(&self, id: i64) -> Result<Post, RepoError> {
        sqlx::query_as::<_, Post>(
            r#"SELECT id, title, slug, content, status, visible, created_at, updated_at
               FROM posts
               WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(operation = "get_post", post_id = id, error = %e, "post storage failure");
            RepoError::Storage(e)
        })?
        .ok_or(RepoError::NotFound)
    }

    /// create_post
    ///
    /// Inserts a new post as `draft` / not visible, with both timestamps set to now, and
    /// returns the stored row including its assigned id.
    async fn create_post(&self, req: CreatePostRequest) -> Result<Post, RepoError> {
        let now = Utc::now();
        sqlx::query_as::<_, Post>(
            r#"INSERT INTO posts (title, slug, content, status, visible, created_at, updated_at)
               VALUES (?, ?, ?, ?, FALSE, ?, ?)
               RETURNING id, title, slug, content, status, visible, created_at, updated_at"#,
        )
        .bind(&req.title)
        .bind(&req.slug)
        .bind(&req.content)
        .bind(PostStatus::Draft)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(operation = "create_post", slug = %req.slug, error = %e, "post storage failure");
            RepoError::Storage(e)
        })
    }

    /// update_post
    ///
    /// Overwrites title, content, status and visibility and refreshes `updated_at`. The slug and
    /// `created_at` are untouched. An unknown id is `NotFound`, not a silent success.
    async fn update_post(&self, id: i64, req: UpdatePostRequest) -> Result<Post, RepoError> {
        sqlx::query_as::<_, Post>(
            r#"UPDATE posts
               SET title = ?, content = ?, status = ?, visible = ?, updated_at = ?
               WHERE id = ?
               RETURNING id, title, slug, content, status, visible, created_at, updated_at"#,
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(req.status)
        .bind(req.visible)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(operation = "update_post", post_id = id, error = %e, "post storage failure");
            RepoError::Storage(e)
        })?
        .ok_or(RepoError::NotFound)
    }

    /// delete_post
    ///
    /// Hard delete. An unknown id is `NotFound`.
    async fn delete_post(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(operation = "delete_post", post_id = id, error = %e, "post storage failure");
                RepoError::Storage(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

/// PostStatus
///
/// Publication state. Stored and serialized in lowercase (`"draft"`, `"published"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[ts(export)]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

/// Post
///
/// One blog entry, as stored in the `posts` table. Publicly readable only when
/// `status == Published && visible`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Post {
    // Assigned by the database on insert, never reassigned.
    pub id: i64,
    pub title: String,
    // Public lookup key. Not enforced unique.
    pub slug: String,
    pub content: String,
    pub status: PostStatus,
    pub visible: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    // Refreshed on every mutation.
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_public(&self) -> bool {
        self.status == PostStatus::Published && self.visible
    }
}

// --- Request Payloads ---

/// CreatePostRequest
///
/// Body of `POST /admin/posts`. Status, visibility, id and timestamps sent by the caller are
/// ignored: every new post starts as a hidden draft.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePostRequest {
    pub title: String,
    pub slug: String,
    pub content: String,
}

impl CreatePostRequest {
    /// Rejects posts that could never be addressed or listed meaningfully.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty");
        }
        if self.slug.trim().is_empty() {
            return Err("slug must not be empty");
        }
        Ok(())
    }
}

/// UpdatePostRequest
///
/// Body of `PUT /admin/posts/{id}`. A full overwrite of the editable fields; the slug is
/// fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub visible: bool,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty");
        }
        Ok(())
    }
}

/// LoginRequest
///
/// Body of `POST /admin/login`. The password is verified and dropped; it is never stored or logged.
#[derive(Deserialize, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub password: String,
}

/// LoginResponse
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// UploadResponse
///
/// Where an accepted upload was written, relative to the server's working directory unless
/// the upload directory is absolute.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct UploadResponse {
    pub path: String,
}

#![allow(dead_code)]

use std::{path::Path, sync::Arc, sync::OnceLock};

use scopo_blog::{
    AppConfig, AppState, create_router, db,
    models::{CreatePostRequest, PostStatus, UpdatePostRequest},
    password,
    repository::{RepositoryState, SqliteRepository},
};
use sqlx::SqlitePool;

pub const TEST_PASSWORD: &str = "open-sesame-for-tests";
pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

/// Argon2 is slow; one hash per test binary.
pub fn test_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| password::hash_secret(TEST_PASSWORD).expect("hash test password"))
}

/// Fresh in-memory database with the schema applied.
pub async fn memory_pool() -> SqlitePool {
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    db::init_schema(&pool).await.expect("create schema");
    pool
}

pub async fn memory_repo() -> SqliteRepository {
    SqliteRepository::new(memory_pool().await)
}

pub fn test_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        admin_password_hash: test_password_hash().to_string(),
        upload_dir: upload_dir.to_path_buf(),
        max_upload_size: 1024,
        allowed_extensions: vec![".jpg".to_string(), ".png".to_string()],
        ..AppConfig::default()
    }
}

pub async fn test_state(upload_dir: &Path) -> AppState {
    let repo = Arc::new(memory_repo().await) as RepositoryState;
    AppState::new(test_config(upload_dir), repo)
}

pub async fn test_router(upload_dir: &Path) -> axum::Router {
    create_router(test_state(upload_dir).await)
}

pub fn new_post(title: &str, slug: &str) -> CreatePostRequest {
    CreatePostRequest {
        title: title.to_string(),
        slug: slug.to_string(),
        content: format!("content of {title}"),
    }
}

pub fn edit(title: &str, status: PostStatus, visible: bool) -> UpdatePostRequest {
    UpdatePostRequest {
        title: title.to_string(),
        content: format!("edited {title}"),
        status,
        visible,
    }
}

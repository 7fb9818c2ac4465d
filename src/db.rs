use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

const CREATE_POSTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS posts (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        title      TEXT     NOT NULL,
        slug       TEXT     NOT NULL,
        content    TEXT     NOT NULL,
        status     TEXT     NOT NULL,
        visible    BOOLEAN  NOT NULL,
        created_at DATETIME NOT NULL,
        updated_at DATETIME NOT NULL
    )
"#;

const CREATE_SLUG_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_posts_slug ON posts (slug)";

/// connect
///
/// Opens a pool on `database_url`, creating the database file if it is missing.
///
/// An in-memory database lives only as long as its connection, so `:memory:` URLs get a single
/// connection that is never recycled.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    pool_options.connect_with(options).await
}

/// init_schema
///
/// Idempotent. Safe to run on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_POSTS_TABLE).execute(pool).await?;
    sqlx::query(CREATE_SLUG_INDEX).execute(pool).await?;
    Ok(())
}

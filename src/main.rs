use scopo_blog::{
    AppState,
    config::{AppConfig, Env},
    create_router, db,
    repository::{RepositoryState, SqliteRepository},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, opens and bootstraps the database, makes sure the
/// upload directory is usable, then serves. Any failure before `serve` is fatal.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"));

    // 2. Logging
    init_tracing(config.env);
    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Database
    let pool = db::connect(&config.database_url)
        .await
        .expect("FATAL: Failed to open the SQLite database. Check DATABASE_URL.");
    db::init_schema(&pool)
        .await
        .expect("FATAL: Failed to create the posts schema.");
    tracing::info!("Database initialized successfully.");

    let repo = Arc::new(SqliteRepository::new(pool)) as RepositoryState;

    // 4. Upload directory
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("FATAL: Upload directory cannot be created. Check UPLOAD_DIR.");
    let metadata = tokio::fs::metadata(&config.upload_dir)
        .await
        .expect("FATAL: Upload directory is not accessible. Check UPLOAD_DIR.");
    if metadata.permissions().readonly() {
        panic!("FATAL: Upload directory {} is read-only.", config.upload_dir.display());
    }

    // 5. State, router, server
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(config, repo));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind the listen address. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}

/// Pretty output locally, JSON in production. `RUST_LOG` overrides the default filter.
fn init_tracing(env: Env) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scopo_blog=debug,tower_http=info".into());

    match env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }
}

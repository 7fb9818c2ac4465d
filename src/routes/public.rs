use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that need no token. Post reads only ever see published, visible posts; that
/// filter lives in the repository query, not here.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        .route("/", get(|| async { "Welcome to the Blog API" }))
        // GET /ping, GET /health
        // Liveness checks for humans and load balancers.
        .route("/ping", get(|| async { "pong" }))
        .route("/health", get(|| async { "ok" }))
        // GET /posts
        // Published, visible posts, newest first.
        .route("/posts", get(handlers::list_posts))
        // GET /posts/{slug}
        // 404 for unknown slugs and for drafts/hidden posts alike.
        .route("/posts/{slug}", get(handlers::get_post_by_slug))
        // POST /admin/login
        // The only /admin route that is reachable without a token.
        .route("/admin/login", post(handlers::login))
}

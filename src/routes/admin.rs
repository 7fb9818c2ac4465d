use crate::{AppState, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Multipart framing around the file itself: boundaries, part headers, the filename.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Admin Router Module
///
/// Routes for the single admin identity under `/admin`. The handlers do no token checks of
/// their own: `create_router` wraps this whole router in the bearer-token route layer, and
/// that layer is the only place a token is validated.
pub fn admin_routes(max_upload_size: u64) -> Router<AppState> {
    let upload_body_limit = usize::try_from(max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        // POST /admin/posts
        // Creates a hidden draft.
        .route("/admin/posts", post(handlers::create_post))
        // GET /admin/posts/drafts
        // Everything that is not publicly listed.
        .route("/admin/posts/drafts", get(handlers::list_drafts))
        // GET/PUT/DELETE /admin/posts/{id}
        .route(
            "/admin/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        // POST /admin/upload
        // The default 2 MB body cap would cut uploads off before the store's own size check.
        .route(
            "/admin/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
}

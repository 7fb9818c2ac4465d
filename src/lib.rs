use std::sync::Arc;

use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repository;
pub mod storage;

pub mod routes;
use auth::AdminSession;
use routes::{admin, public};

// --- Public Re-exports ---

pub use auth::{TokenService, TokenState};
pub use config::AppConfig;
pub use error::ApiError;
pub use repository::{RepositoryState, SqliteRepository};
pub use storage::{LocalUploadStore, UploadState};

/// ApiDoc
///
/// OpenAPI document for every handler and JSON schema, served at `/api-docs/openapi.json`
/// and browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_posts, handlers::get_post_by_slug, handlers::login,
        handlers::create_post, handlers::list_drafts, handlers::get_post,
        handlers::update_post, handlers::delete_post, handlers::upload_file
    ),
    components(
        schemas(
            models::Post, models::PostStatus, models::CreatePostRequest,
            models::UpdatePostRequest, models::LoginRequest, models::LoginResponse,
            models::UploadResponse,
        )
    ),
    tags(
        (name = "scopo-blog", description = "Personal blog content API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Every service a handler can reach, built once at startup and cloned (cheaply, behind
/// `Arc`s) into each request.
#[derive(Clone)]
pub struct AppState {
    /// Post persistence.
    pub repo: RepositoryState,
    /// Upload validation and storage.
    pub uploads: UploadState,
    /// Admin token issue/validate.
    pub tokens: TokenState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Builds the token service and upload store from `config`; the repository comes from the
    /// caller because it needs an open pool.
    pub fn new(config: AppConfig, repo: RepositoryState) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt_secret)) as TokenState;
        let uploads = Arc::new(LocalUploadStore::from_config(&config)) as UploadState;
        Self {
            repo,
            uploads,
            tokens,
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// `AdminSession` pulls the token service out of whatever state the router carries.
impl FromRef<AppState> for TokenState {
    fn from_ref(app_state: &AppState) -> TokenState {
        app_state.tokens.clone()
    }
}

/// auth_middleware
///
/// Guards the admin router. Extracting `AdminSession` validates the bearer token; on failure
/// the extractor answers 401 and the handler never runs.
async fn auth_middleware(_session: AdminSession, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles public and admin routes, the auth layer, request-id correlation, tracing and CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            admin::admin_routes(state.config.max_upload_size).route_layer(
                middleware::from_fn_with_state(state.clone(), auth_middleware),
            ),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// One span per request, tagged with the `x-request-id` set by the layer above. Only the
/// method and path are recorded; headers (and so bearer tokens) never reach the logs.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        path = %request.uri().path(),
        req_id = %request_id,
    )
}

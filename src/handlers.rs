use crate::{
    AppState,
    auth::AuthError,
    error::ApiError,
    models::{
        CreatePostRequest, LoginRequest, LoginResponse, Post, UpdatePostRequest,
        UploadResponse,
    },
    password,
};
use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

// --- Public Handlers ---

/// list_posts
///
/// [Public Route] Lists published, visible posts, newest first. Empty list when there are none.
#[utoipa::path(
    get,
    path = "/posts",
    responses((status = 200, description = "Published posts", body = [Post]))
)]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.repo.list_published().await?;
    Ok(Json(posts))
}

/// get_post_by_slug
///
/// [Public Route] A single published, visible post. Drafts and hidden posts answer 404 exactly
/// like an unknown slug.
#[utoipa::path(
    get,
    path = "/posts/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Found", body = Post),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post = state.repo.get_by_slug(&slug).await?;
    Ok(Json(post))
}

/// login
///
/// [Public Route] Exchanges the admin password for a 24-hour bearer token.
///
/// The Argon2 check runs on the blocking pool. A wrong password and a malformed stored hash are
/// both plain 401s.
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(LoginRequest { password }) = payload?;
    let stored_hash = state.config.admin_password_hash.clone();

    let verified =
        tokio::task::spawn_blocking(move || password::verify_secret(&password, &stored_hash))
            .await
            .map_err(|e| ApiError::Internal(format!("credential check did not complete: {e}")))?;

    if !verified {
        tracing::warn!("rejected admin login");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue()?;
    tracing::info!("admin login succeeded");

    Ok(Json(LoginResponse {
        token,
        message: "Login successful".to_string(),
        expires_in: state.tokens.lifetime_seconds(),
    }))
}

// --- Admin Handlers ---
// Reached only through the bearer-token route layer in `create_router`.

/// create_post
///
/// [Admin Route] Creates a post. Whatever status or visibility the body carries, the stored
/// post is a hidden draft.
#[utoipa::path(
    post,
    path = "/admin/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created", body = Post),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let Json(payload) = payload?;
    payload
        .validate()
        .map_err(|reason| ApiError::Validation(reason.to_string()))?;

    let post = state.repo.create_post(payload).await?;
    tracing::info!(post_id = post.id, slug = %post.slug, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// list_drafts
///
/// [Admin Route] Everything not publicly listed: drafts and hidden posts, newest first.
#[utoipa::path(
    get,
    path = "/admin/posts/drafts",
    responses((status = 200, description = "Unpublished posts", body = [Post]))
)]
pub async fn list_drafts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let drafts = state.repo.list_drafts().await?;
    Ok(Json(drafts))
}

/// get_post
///
/// [Admin Route] Any post by id, regardless of status.
#[utoipa::path(
    get,
    path = "/admin/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = Post),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Post>, ApiError> {
    let Path(id) = id?;
    let post = state.repo.get_post(id).await?;
    Ok(Json(post))
}

/// update_post
///
/// [Admin Route] Overwrites title, content, status and visibility. This is how a draft gets
/// published. A blank title is a 400, as on create. Unknown ids are 404.
#[utoipa::path(
    put,
    path = "/admin/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated", body = Post),
        (status = 400, description = "Malformed id or body, or blank title"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<Post>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload
        .validate()
        .map_err(|reason| ApiError::Validation(reason.to_string()))?;

    let post = state.repo.update_post(id, payload).await?;
    tracing::info!(post_id = id, status = ?post.status, visible = post.visible, "post updated");
    Ok(Json(post))
}

/// delete_post
///
/// [Admin Route] Hard delete. Unknown ids are 404.
#[utoipa::path(
    delete,
    path = "/admin/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.repo.delete_post(id).await?;
    tracing::info!(post_id = id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// upload_file
///
/// [Admin Route] Stores the multipart field named `file`. The size and extension checks run
/// in the upload store before anything touches the disk.
#[utoipa::path(
    post,
    path = "/admin/upload",
    responses(
        (status = 201, description = "Stored", body = UploadResponse),
        (status = 400, description = "Rejected upload")
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| ApiError::Validation("file field has no file name".to_string()))?;

        let bytes = field.bytes().await?;
        let mut reader: &[u8] = &bytes;
        let path = state
            .uploads
            .save(&mut reader, &file_name, bytes.len() as u64)
            .await?;

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                path: path.display().to_string(),
            }),
        ));
    }

    Err(ApiError::Validation("missing multipart field \"file\"".to_string()))
}

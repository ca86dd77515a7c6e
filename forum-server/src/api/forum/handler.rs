//! Forum API Handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use shared::models::{
    CategoryListing, CategoryPosts, ForumPost, ForumReply, PostCreate, PostDetail, PostUpdate,
    ReplyCreate,
};
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::permissions::ResolvedPermissions;
use crate::services::forum;
use crate::utils::{ApiResponse, AppResult, ok};

/// Anonymous callers get the empty resolution
fn resolved(caller: &Option<CurrentUser>) -> Arc<ResolvedPermissions> {
    caller
        .as_ref()
        .map(|u| u.permissions.clone())
        .unwrap_or_default()
}

/// GET /api/forum/categories
pub async fn categories(
    State(state): State<ServerState>,
    caller: Option<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<CategoryListing>>>> {
    let listings = forum::categories(&state.pool, &resolved(&caller)).await?;
    Ok(ok(listings))
}

/// GET /api/forum/categories/{slug}/posts
pub async fn category_posts(
    State(state): State<ServerState>,
    caller: Option<CurrentUser>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<CategoryPosts>>> {
    let page = forum::category_posts(&state.pool, &resolved(&caller), &slug).await?;
    Ok(ok(page))
}

/// GET /api/forum/posts/{id}
pub async fn post_detail(
    State(state): State<ServerState>,
    caller: Option<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<PostDetail>>> {
    let detail = forum::post_detail(&state.pool, &resolved(&caller), id).await?;
    Ok(ok(detail))
}

/// POST /api/forum/posts
pub async fn create_post(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<PostCreate>,
) -> AppResult<Json<ApiResponse<ForumPost>>> {
    let post = forum::create_post(&state.pool, &current_user, payload).await?;
    Ok(ok(post))
}

/// PUT /api/forum/posts/{id}
pub async fn update_post(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<PostUpdate>,
) -> AppResult<Json<ApiResponse<ForumPost>>> {
    let post = forum::update_post(&state.pool, &current_user, id, payload).await?;
    Ok(ok(post))
}

/// DELETE /api/forum/posts/{id}
pub async fn delete_post(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    forum::delete_post(&state.pool, &current_user, id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// POST /api/forum/posts/{id}/replies
pub async fn create_reply(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ReplyCreate>,
) -> AppResult<Json<ApiResponse<ForumReply>>> {
    let reply = forum::reply(&state.pool, &state.hub, &current_user, id, &payload.content).await?;
    Ok(ok(reply))
}

/// DELETE /api/forum/replies/{id}
pub async fn delete_reply(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    forum::delete_reply(&state.pool, &current_user, id).await?;
    Ok(Json(ApiResponse::ok()))
}

//! Moderation API Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use serde::Deserialize;
use shared::models::{
    AdminStats, ForumPost, ModerationLogEntry, ModerationLogQuery, ModerationToggle, PostSummary,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::moderation;
use crate::utils::{ApiResponse, AppResult, ok};

#[derive(Debug, Default, Deserialize)]
pub struct PostQuery {
    /// Title fragment
    search: Option<String>,
}

/// GET /api/moderation/posts - 100 most recent threads
pub async fn list_posts(
    State(state): State<ServerState>,
    Query(query): Query<PostQuery>,
) -> AppResult<Json<ApiResponse<Vec<PostSummary>>>> {
    let posts = moderation::list_posts(&state.pool, query.search.as_deref()).await?;
    Ok(ok(posts))
}

/// POST /api/moderation/posts/{id}/toggle - Body: `{"flag": "locked"}`
pub async fn toggle_flag(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ModerationToggle>,
) -> AppResult<Json<ApiResponse<ForumPost>>> {
    tracing::info!(
        user_id = %current_user.id,
        post_id = id,
        flag = %payload.flag,
        "Toggling post flag"
    );
    let post = moderation::toggle_flag(&state.pool, &current_user.id, id, payload.flag).await?;
    Ok(ok(post))
}

/// GET /api/moderation-logs
pub async fn logs(
    State(state): State<ServerState>,
    Query(query): Query<ModerationLogQuery>,
) -> AppResult<Json<ApiResponse<Vec<ModerationLogEntry>>>> {
    Ok(ok(moderation::logs(&state.pool, &query).await?))
}

/// GET /api/admin/stats - Dashboard counters
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<AdminStats>>> {
    Ok(ok(moderation::stats(&state.pool).await?))
}

//! Notification API Handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use serde::Serialize;
use shared::models::NotificationList;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::notifications;
use crate::utils::{ApiResponse, AppResult, ok};

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

/// GET /api/notifications
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<NotificationList>>> {
    Ok(ok(notifications::list(&state.pool, &current_user.id).await?))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<UnreadCount>>> {
    let unread_count =
        notifications::mark_read(&state.pool, &state.hub, &current_user.id, id).await?;
    Ok(ok(UnreadCount { unread_count }))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<MarkedRead>>> {
    let updated = notifications::mark_all_read(&state.pool, &state.hub, &current_user.id).await?;
    Ok(ok(MarkedRead { updated }))
}

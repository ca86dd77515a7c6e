//! User Role API Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use serde::{Deserialize, Serialize};
use shared::models::{UserRolesUpdate, UserWithRoles};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::user_roles;
use crate::utils::{ApiResponse, AppResult, ok};

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    /// Display name fragment
    search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssignedRoles {
    pub user_id: String,
    pub role_ids: Vec<i64>,
}

/// GET /api/users - Profiles with their roles
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<ApiResponse<Vec<UserWithRoles>>>> {
    let users = user_roles::list_users(&state.pool, query.search.as_deref()).await?;
    Ok(ok(users))
}

/// PUT /api/users/{user_id}/roles - Replace the user's role set
pub async fn replace_roles(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    Json(payload): Json<UserRolesUpdate>,
) -> AppResult<Json<ApiResponse<AssignedRoles>>> {
    tracing::info!(
        user_id = %current_user.id,
        target_user = %user_id,
        role_ids = ?payload.role_ids,
        "Replacing user roles"
    );
    let role_ids =
        user_roles::replace(&state.pool, &current_user.id, &user_id, &payload.role_ids).await?;
    Ok(ok(AssignedRoles { user_id, role_ids }))
}

//! Role API Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use serde::Deserialize;
use shared::models::{GrantToggled, Permission, PermissionMatrix, Role, RoleCreate, RoleUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::roles;
use crate::utils::{ApiResponse, AppResult, ok};

/// `?confirm=true` must be passed to delete
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    confirm: bool,
}

/// GET /api/roles - Roles by priority
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Role>>>> {
    Ok(ok(roles::list(&state.pool).await?))
}

/// GET /api/permissions - All permissions by category
pub async fn list_permissions(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Permission>>>> {
    Ok(ok(roles::list_permissions(&state.pool).await?))
}

/// GET /api/permissions/matrix
pub async fn matrix(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<PermissionMatrix>>> {
    Ok(ok(roles::matrix(&state.pool).await?))
}

/// POST /api/roles - Create a new role
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<RoleCreate>,
) -> AppResult<Json<ApiResponse<Role>>> {
    tracing::info!(
        user_id = %current_user.id,
        role_name = %payload.name,
        "Creating role"
    );
    let r = roles::create(&state.pool, &current_user.id, payload).await?;
    Ok(ok(r))
}

/// PUT /api/roles/{id} - Update a role
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<ApiResponse<Role>>> {
    tracing::info!(user_id = %current_user.id, role_id = %id, "Updating role");
    let r = roles::update(&state.pool, &current_user.id, id, payload).await?;
    Ok(ok(r))
}

/// DELETE /api/roles/{id}?confirm=true - Delete a role
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<Json<ApiResponse<Role>>> {
    tracing::info!(
        user_id = %current_user.id,
        role_id = %id,
        confirm = query.confirm,
        "Deleting role"
    );
    let r = roles::delete(&state.pool, &current_user.id, id, query.confirm).await?;
    Ok(ok(r))
}

/// POST /api/roles/{id}/permissions/{permission_id}/toggle
pub async fn toggle_permission(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((role_id, permission_id)): Path<(i64, i64)>,
) -> AppResult<Json<ApiResponse<GrantToggled>>> {
    tracing::info!(
        user_id = %current_user.id,
        role_id,
        permission_id,
        "Toggling role permission"
    );
    let toggled = roles::toggle_permission(&state.pool, &current_user.id, role_id, permission_id).await?;
    Ok(ok(toggled))
}

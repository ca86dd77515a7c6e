//! Category Permission API Handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use shared::models::{CategoryPermission, CategoryPermissionToggle};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::category_access;
use crate::utils::{ApiResponse, AppResult, ok};

/// GET /api/category-permissions - Every overlay row
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<CategoryPermission>>>> {
    Ok(ok(category_access::list(&state.pool).await?))
}

/// POST /api/categories/{category_id}/roles/{role_id}/toggle
///
/// Body: `{"field": "can_reply", "value": false}`
pub async fn toggle(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((category_id, role_id)): Path<(i64, i64)>,
    Json(payload): Json<CategoryPermissionToggle>,
) -> AppResult<Json<ApiResponse<CategoryPermission>>> {
    tracing::info!(
        user_id = %current_user.id,
        category_id,
        role_id,
        field = %payload.field,
        value = payload.value,
        "Updating category permission"
    );
    let row =
        category_access::toggle(&state.pool, &current_user.id, category_id, role_id, payload)
            .await?;
    Ok(ok(row))
}

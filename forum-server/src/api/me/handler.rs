//! Me API Handlers

use axum::Json;
use axum::extract::{Extension, State};
use serde::Serialize;
use shared::models::{Profile, ProfileUpdate, Role};
use std::collections::BTreeSet;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::profile;
use crate::utils::validation::{MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text};
use crate::utils::{ApiResponse, AppResult, ok};

/// Effective permissions of the caller, as the frontend consumes them
#[derive(Debug, Serialize)]
pub struct MyPermissions {
    pub user_id: String,
    pub roles: Vec<Role>,
    pub permissions: BTreeSet<String>,
    pub primary_role: Option<Role>,
    pub is_staff: bool,
    pub can_access_admin_panel: bool,
}

/// GET /api/me/permissions
pub async fn permissions(
    Extension(current_user): Extension<CurrentUser>,
) -> Json<ApiResponse<MyPermissions>> {
    let resolved = &current_user.permissions;
    ok(MyPermissions {
        user_id: current_user.id.clone(),
        roles: resolved.roles.clone(),
        permissions: resolved.permissions.clone(),
        primary_role: resolved.primary_role.clone(),
        is_staff: resolved.is_staff(),
        can_access_admin_panel: resolved.can_access_admin_panel(),
    })
}

/// GET /api/me/profile - `null` until the first update
pub async fn profile(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Option<Profile>>>> {
    let p = profile::find_by_user(&state.pool, &current_user.id).await?;
    Ok(ok(p))
}

/// PUT /api/me/profile
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let payload = ProfileUpdate {
        display_name: payload
            .display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        avatar_url: payload.avatar_url,
    };
    validate_optional_text(&payload.display_name, "display_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.avatar_url, "avatar_url", MAX_URL_LEN)?;

    let p = profile::upsert(&state.pool, &current_user.id, &payload).await?;
    tracing::info!(user_id = %current_user.id, "Profile updated");
    Ok(ok(p))
}

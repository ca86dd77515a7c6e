//! Role API Module
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/roles | GET | access_admin_panel |
//! | /api/permissions | GET | access_admin_panel |
//! | /api/roles | POST | manage_roles |
//! | /api/roles/{id} | PUT/DELETE | manage_roles |
//! | /api/permissions/matrix | GET | manage_permissions |
//! | /api/roles/{id}/permissions/{permission_id}/toggle | POST | manage_permissions |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::permissions::{ACCESS_ADMIN_PANEL, MANAGE_PERMISSIONS, MANAGE_ROLES};
use crate::auth::require_permission;
use crate::core::ServerState;

/// Role router - each group carries its own permission check
pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/api/roles", get(handler::list))
        .route("/api/permissions", get(handler::list_permissions))
        .layer(middleware::from_fn(require_permission(ACCESS_ADMIN_PANEL)));

    let write_routes = Router::new()
        .route("/api/roles", post(handler::create))
        .route("/api/roles/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_permission(MANAGE_ROLES)));

    let matrix_routes = Router::new()
        .route("/api/permissions/matrix", get(handler::matrix))
        .route(
            "/api/roles/{id}/permissions/{permission_id}/toggle",
            post(handler::toggle_permission),
        )
        .layer(middleware::from_fn(require_permission(MANAGE_PERMISSIONS)));

    read_routes.merge(write_routes).merge(matrix_routes)
}

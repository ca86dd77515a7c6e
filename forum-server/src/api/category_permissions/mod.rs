//! Category Permission API Module
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/category-permissions | GET | manage_categories |
//! | /api/categories/{category_id}/roles/{role_id}/toggle | POST | manage_categories |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::permissions::MANAGE_CATEGORIES;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/category-permissions", get(handler::list))
        .route(
            "/api/categories/{category_id}/roles/{role_id}/toggle",
            post(handler::toggle),
        )
        .layer(middleware::from_fn(require_permission(MANAGE_CATEGORIES)))
}

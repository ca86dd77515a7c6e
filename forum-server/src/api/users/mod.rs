//! User Role API Module
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/users?search= | GET | assign_roles |
//! | /api/users/{user_id}/roles | PUT | assign_roles |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::permissions::ASSIGN_ROLES;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/users", get(handler::list))
        .route("/api/users/{user_id}/roles", put(handler::replace_roles))
        .layer(middleware::from_fn(require_permission(ASSIGN_ROLES)))
}

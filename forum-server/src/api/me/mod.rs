//! 当前用户路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/me/permissions | GET | 角色、权限、主角色 |
//! | /api/me/profile | GET/PUT | 个人资料 |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/me/permissions", get(handler::permissions))
        .route("/api/me/profile", get(handler::profile).put(handler::update_profile))
        .layer(middleware::from_fn(require_auth))
}

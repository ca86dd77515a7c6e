//! Moderation API Module
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/moderation/posts?search= | GET | moderate_posts |
//! | /api/moderation/posts/{id}/toggle | POST | moderate_posts |
//! | /api/moderation-logs?limit=&search= | GET | view_logs |
//! | /api/admin/stats | GET | access_admin_panel |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::permissions::{ACCESS_ADMIN_PANEL, MODERATE_POSTS, VIEW_LOGS};
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let post_routes = Router::new()
        .route("/api/moderation/posts", get(handler::list_posts))
        .route("/api/moderation/posts/{id}/toggle", post(handler::toggle_flag))
        .layer(middleware::from_fn(require_permission(MODERATE_POSTS)));

    let log_routes = Router::new()
        .route("/api/moderation-logs", get(handler::logs))
        .layer(middleware::from_fn(require_permission(VIEW_LOGS)));

    let stats_routes = Router::new()
        .route("/api/admin/stats", get(handler::stats))
        .layer(middleware::from_fn(require_permission(ACCESS_ADMIN_PANEL)));

    post_routes.merge(log_routes).merge(stats_routes)
}

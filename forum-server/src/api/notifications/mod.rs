//! Notification API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/notifications | GET | 最近 10 条 + 未读数 |
//! | /api/notifications/{id}/read | POST | 单条已读 |
//! | /api/notifications/read-all | POST | 全部已读 |
//! | /api/notifications/ws | GET | WebSocket 实时推送 (`?token=`) |
//!
//! All routes require a signed-in caller and only ever touch the caller's
//! own notifications.

mod handler;
mod ws;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/notifications", get(handler::list))
        .route("/api/notifications/read-all", post(handler::mark_all_read))
        .route("/api/notifications/{id}/read", post(handler::mark_read))
        .route("/api/notifications/ws", get(ws::handle_notification_ws))
        .layer(middleware::from_fn(require_auth))
}

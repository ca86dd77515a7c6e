//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`me`] - 当前用户的权限与资料
//! - [`roles`] - 角色、权限、权限矩阵
//! - [`category_permissions`] - 分类权限覆盖
//! - [`users`] - 用户角色分配
//! - [`moderation`] - 帖子审核、审核日志、后台统计
//! - [`forum`] - 论坛分类、帖子、回复
//! - [`notifications`] - 通知与 WebSocket 推送

pub mod category_permissions;
pub mod forum;
pub mod health;
pub mod me;
pub mod moderation;
pub mod notifications;
pub mod roles;
pub mod users;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::authenticate;
use crate::core::ServerState;

pub use crate::utils::{AppResult, ok};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Caller's own permissions and profile - authentication required
        .merge(me::router())
        // Admin API - permission required per route group
        .merge(roles::router())
        .merge(category_permissions::router())
        .merge(users::router())
        .merge(moderation::router())
        // Forum API - public reads, authenticated writes
        .merge(forum::router())
        // Notification API and WebSocket - authentication required
        .merge(notifications::router())
}

/// Build a fully configured application with all middleware
///
/// Used by the HTTP server and by the integration tests
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Resolve the caller (JWT + roles) - executes before routes, injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ))
}

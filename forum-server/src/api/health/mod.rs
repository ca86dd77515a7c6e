//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 健康检查 (含数据库探测) | 无 |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::ApiResponse;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    database: bool,
    /// 当前有 WebSocket 连接的用户数
    realtime_users: usize,
}

async fn health(State(state): State<ServerState>) -> Json<ApiResponse<HealthResponse>> {
    let database = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Health check database probe failed"))
        .is_ok();

    Json(ApiResponse::success(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        realtime_users: state.hub.user_count(),
    }))
}

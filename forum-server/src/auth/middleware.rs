//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::auth::permissions::is_valid_permission;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Path that may carry the token as `?token=` (browsers cannot set headers on WebSocket)
pub const WS_PATH: &str = "/api/notifications/ws";

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// 认证中间件 - 解析调用者
///
/// Reads `Authorization: Bearer <token>` (or `?token=` on [`WS_PATH`]),
/// validates it, resolves the caller's roles and permissions and injects
/// [`CurrentUser`] into the request extensions.
///
/// Requests without a token pass through anonymously; routes that need a
/// caller are wrapped in [`require_auth`]. A token that is present but
/// invalid is always rejected.
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn authenticate(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS 预检
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let header_token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|header| {
            JwtService::extract_from_header(header)
                .map(str::to_string)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))
        })
        .transpose()?;

    let token = match header_token {
        Some(token) => Some(token),
        None if req.uri().path() == WS_PATH => Query::<TokenQuery>::try_from_uri(req.uri())
            .ok()
            .and_then(|Query(q)| q.token),
        None => None,
    };

    let Some(token) = token else {
        return Ok(next.run(req).await);
    };

    let claims = match state.jwt_service.validate_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(WARN, "auth_failed", error = %e, uri = %req.uri());
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    let permissions = state.resolver.resolve(Some(&claims.sub)).await;
    req.extensions_mut()
        .insert(CurrentUser::new(claims, permissions));

    Ok(next.run(req).await)
}

/// 要求登录
pub async fn require_auth(req: Request, next: Next) -> Result<Response, AppError> {
    if req.extensions().get::<CurrentUser>().is_none() {
        security_log!(WARN, "auth_missing", uri = %req.uri());
        return Err(AppError::not_authenticated());
    }
    Ok(next.run(req).await)
}

/// 权限检查中间件 - 要求特定权限
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/roles", post(handler::create))
///     .layer(middleware::from_fn(require_permission(MANAGE_ROLES)));
/// ```
///
/// 未登录返回 401，无权限返回 403。`permission` 必须是已知权限名。
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    debug_assert!(
        is_valid_permission(permission),
        "unknown permission guard: {permission}"
    );
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::not_authenticated)?;

            if !user.has_permission(permission) {
                security_log!(
                    WARN,
                    "permission_denied",
                    user_id = %user.id,
                    required_permission = permission
                );
                return Err(AppError::permission_denied(permission));
            }

            Ok(next.run(req).await)
        })
    }
}

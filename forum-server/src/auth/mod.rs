//! 认证授权模块
//!
//! - [`JwtService`] - 校验身份提供方签发的 JWT
//! - [`CurrentUser`] - 当前用户上下文 (含本次请求解析出的权限)
//! - [`authenticate`] - 解析调用者的中间件
//! - [`require_auth`] / [`require_permission`] - 路由守卫

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{authenticate, require_auth, require_permission};

//! JWT 令牌服务
//!
//! Tokens are issued by the external identity provider and signed with a
//! shared HS256 secret. This service only needs to validate them; token
//! generation exists for development tooling and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::permissions::ResolvedPermissions;

/// Minimum secret length accepted outside development
pub const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret
    pub secret: String,
    /// Expected `iss`, checked only when set
    pub issuer: Option<String>,
    /// Expected `aud`, checked only when set
    pub audience: Option<String>,
    /// Clock skew tolerance (seconds)
    pub leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: None,
            audience: None,
            leeway_secs: 60,
        }
    }
}

/// Claims read from the identity provider's token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 过期时间戳
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Sign a token the same way the identity provider does
    pub fn generate_token(
        &self,
        user_id: &str,
        email: Option<&str>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            exp: (now + ttl).timestamp(),
            iat: Some(now.timestamp()),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.config.leeway_secs;
        validation.set_required_spec_claims(&["sub", "exp"]);
        if let Some(issuer) = &self.config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &self.config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(JwtError::InvalidToken("empty subject".into()));
        }
        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }
}

/// 当前用户上下文
///
/// Built by the auth middleware from validated claims plus the permissions
/// resolved for this request.
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> AppResult<Json<()>> {
///     if user.has_permission("moderate_posts") {
///         // ...
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID (JWT `sub`)
    pub id: String,
    pub email: Option<String>,
    pub permissions: Arc<ResolvedPermissions>,
}

impl CurrentUser {
    pub fn new(claims: Claims, permissions: ResolvedPermissions) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            permissions: Arc::new(permissions),
        }
    }

    /// Any assigned role is a staff role
    pub fn is_staff(&self) -> bool {
        self.permissions.is_staff()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.has_permission(permission)
    }

    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        self.permissions.has_any_permission(permissions)
    }

    /// Author of the resource, or staff
    pub fn can_manage(&self, owner_id: &str) -> bool {
        self.id == owner_id || self.is_staff()
    }
}

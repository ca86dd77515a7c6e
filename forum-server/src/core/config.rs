use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::auth::JwtConfig;
use crate::auth::jwt::MIN_SECRET_LEN;
use crate::core::ServerError;
use crate::realtime::hub::DEFAULT_CAPACITY;

/// 服务器配置
///
/// # 环境变量
///
/// 启动时先读取 `.env` (dotenvy)，再从环境变量加载：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_URL | sqlite:forum.db | SQLite 数据库 |
/// | DB_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | JWT_SECRET | (开发环境随机生成) | 身份提供方的 HS256 密钥 |
/// | JWT_ISSUER | - | 设置后校验 `iss` |
/// | JWT_AUDIENCE | - | 设置后校验 `aud` |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 (`RUST_LOG` 优先) |
/// | LOG_JSON | false | JSON 日志 |
/// | LOG_DIR | - | 日志文件目录 |
/// | NOTIFICATION_CHANNEL_CAPACITY | 64 | 每用户广播缓冲 |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub notification_channel_capacity: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// `JWT_SECRET` is mandatory outside development; in development a
    /// random secret is generated so the server still starts.
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = env_or("ENVIRONMENT", "development");

        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= MIN_SECRET_LEN => secret,
            Ok(_) => {
                return Err(ServerError::Config(format!(
                    "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
                )));
            }
            Err(_) if environment == "development" => generate_dev_secret(),
            Err(_) => {
                return Err(ServerError::Config(
                    "JWT_SECRET environment variable must be set".into(),
                ));
            }
        };

        let mut jwt = JwtConfig::new(secret);
        jwt.issuer = std::env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty());
        jwt.audience = std::env::var("JWT_AUDIENCE").ok().filter(|s| !s.is_empty());

        Ok(Self {
            database_url: env_or("DATABASE_URL", "sqlite:forum.db"),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", 5),
            http_port: env_parse("HTTP_PORT", 3000),
            jwt,
            environment,
            log_level: env_or("LOG_LEVEL", "info"),
            log_json: env_parse("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            notification_channel_capacity: env_parse(
                "NOTIFICATION_CHANNEL_CAPACITY",
                DEFAULT_CAPACITY,
            ),
        })
    }

    /// Defaults with an explicit secret and an in-memory database
    ///
    /// 常用于测试场景
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            db_max_connections: 1,
            http_port: 0,
            jwt: JwtConfig::new(secret),
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            notification_channel_capacity: DEFAULT_CAPACITY,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn generate_dev_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_secret_is_long_enough() {
        let secret = generate_dev_secret();
        assert_eq!(secret.len(), 64);
        assert_ne!(secret, generate_dev_secret());
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::with_secret("s".repeat(32));
        assert!(config.is_development());
        assert!(!config.is_production());
        assert!(config.jwt.issuer.is_none());
        assert_eq!(config.notification_channel_capacity, DEFAULT_CAPACITY);
    }
}

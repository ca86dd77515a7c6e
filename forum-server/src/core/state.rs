use sqlx::SqlitePool;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::permissions::PermissionResolver;
use crate::realtime::NotificationHub;

/// 服务器状态 - 持有所有服务的共享引用
///
/// Cloning is cheap: every field is a handle.
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 校验 |
/// | resolver | PermissionResolver | 每请求的权限解析 |
/// | hub | NotificationHub | 每用户的实时通知广播 |
/// | shutdown | CancellationToken | 关闭信号 (WebSocket 会话监听) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub resolver: PermissionResolver,
    pub hub: NotificationHub,
    pub shutdown: CancellationToken,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    pub fn new(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let resolver = PermissionResolver::new(db.pool.clone());
        let hub = NotificationHub::new(config.notification_channel_capacity);

        Self {
            config,
            pool: db.pool,
            jwt_service,
            resolver,
            hub,
            shutdown: CancellationToken::new(),
        }
    }

    /// 打开数据库 (含迁移) 并构造状态
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_url, config.db_max_connections).await?;
        Ok(Self::new(config.clone(), db))
    }
}

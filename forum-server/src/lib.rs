//! Forum Server - 论坛角色、权限与审核服务
//!
//! # 架构概述
//!
//! - **认证** (`auth`): 校验身份提供方签发的 JWT，注入 `CurrentUser`
//! - **权限解析** (`permissions`): 每请求解析角色与权限
//! - **数据库** (`db`): SQLite (sqlx) 与仓储函数
//! - **业务服务** (`services`): 角色、分类权限、用户角色、审核、论坛、通知
//! - **审核日志** (`audit`): 每次特权变更追加一条日志
//! - **实时推送** (`realtime`): 按用户广播通知
//! - **HTTP API** (`api`): RESTful 接口与 WebSocket
//!
//! # 模块结构
//!
//! ```text
//! forum-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、路由守卫
//! ├── permissions/   # 权限解析
//! ├── db/            # 连接池与仓储
//! ├── services/      # 业务规则
//! ├── audit/         # 审核日志写入
//! ├── realtime/      # 通知广播与 feed
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod permissions;
pub mod realtime;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use permissions::{PermissionResolver, ResolvedPermissions};
pub use realtime::NotificationHub;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

//! 业务服务层
//!
//! Handlers stay thin; the rules live here so they can be exercised
//! directly against an in-memory database.
//!
//! - [`roles`] - 角色 CRUD 与权限矩阵
//! - [`category_access`] - 分类权限覆盖
//! - [`user_roles`] - 用户角色分配
//! - [`moderation`] - 帖子审核标记、审核日志、统计
//! - [`notifications`] - 通知读取与已读
//! - [`forum`] - 论坛分类、帖子、回复

pub mod category_access;
pub mod forum;
pub mod moderation;
pub mod notifications;
pub mod roles;
pub mod user_roles;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::db::repository::RepoError;
use crate::utils::AppResult;

pub(crate) async fn begin(pool: &SqlitePool) -> AppResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin().await.map_err(RepoError::from)?)
}

pub(crate) async fn commit(tx: Transaction<'static, Sqlite>) -> AppResult<()> {
    Ok(tx.commit().await.map_err(RepoError::from)?)
}

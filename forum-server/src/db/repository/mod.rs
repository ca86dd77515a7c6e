//! Repository Module
//!
//! Free functions over SQLite. Reads take `&SqlitePool`; writes that must be
//! part of a larger unit of work take any executor so callers can pass
//! `&mut *tx`.

pub mod category_permission;
pub mod forum_category;
pub mod forum_post;
pub mod forum_reply;
pub mod moderation_log;
pub mod notification;
pub mod permission;
pub mod profile;
pub mod role;
pub mod role_permission;
pub mod user_role;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Domain rule violation with a specific error code
    #[error("{1}")]
    Business(ErrorCode, String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Business(code, msg) => AppError::with_message(code, msg),
            RepoError::Database(msg) => {
                if msg.contains("database is locked") {
                    AppError::with_message(ErrorCode::SystemBusy, msg)
                } else {
                    AppError::database(msg)
                }
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Escape `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern and wrap in `%`.
pub(crate) fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;

    use crate::db::DbService;

    /// Fresh in-memory database with schema and seed data
    pub async fn pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }
}

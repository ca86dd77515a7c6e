use thiserror::Error;

/// Startup and lifecycle errors
///
/// Request-level failures use [`crate::utils::AppError`]; this type only
/// covers what can stop the server itself.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl From<shared::error::AppError> for ServerError {
    fn from(err: shared::error::AppError) -> Self {
        ServerError::Database(err.message)
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

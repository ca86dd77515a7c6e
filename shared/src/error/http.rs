//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::RoleNotFound
            | Self::PermissionNotFound
            | Self::CategoryNotFound
            | Self::PostNotFound
            | Self::ReplyNotFound
            | Self::NotificationNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::RoleNameExists | Self::PostLocked => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied
            | Self::StaffRequired
            | Self::NotOwner
            | Self::CategoryViewDenied
            | Self::CategoryCreateDenied
            | Self::CategoryReplyDenied
            | Self::RoleIsSystem => StatusCode::FORBIDDEN,

            // 428 Precondition Required
            Self::ConfirmationRequired => StatusCode::PRECONDITION_REQUIRED,

            // 503 Service Unavailable (transient, client can retry)
            Self::SystemBusy => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

//! Unified error codes for the forum service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Role / permission matrix errors
//! - 4xxx: Forum content errors
//! - 5xxx: Notification errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the admin console and
/// the forum frontend can switch on them without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Destructive operation needs explicit confirmation
    ConfirmationRequired = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Staff role required
    StaffRequired = 2002,
    /// Caller is neither the author nor staff
    NotOwner = 2003,
    /// Category overlay forbids viewing
    CategoryViewDenied = 2101,
    /// Category overlay forbids creating threads
    CategoryCreateDenied = 2102,
    /// Category overlay forbids replying
    CategoryReplyDenied = 2103,

    // ==================== 3xxx: Role ====================
    /// Role not found
    RoleNotFound = 3001,
    /// Role name already exists
    RoleNameExists = 3002,
    /// System role cannot be modified or deleted
    RoleIsSystem = 3003,
    /// Permission not found
    PermissionNotFound = 3101,
    /// Unknown category permission field
    InvalidPermissionField = 3201,

    // ==================== 4xxx: Forum ====================
    /// Forum category not found
    CategoryNotFound = 4001,
    /// Post not found
    PostNotFound = 4101,
    /// Post is locked
    PostLocked = 4102,
    /// Reply not found
    ReplyNotFound = 4201,

    // ==================== 5xxx: Notification ====================
    /// Notification not found
    NotificationNotFound = 5001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// System busy (database locked, retry later)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ConfirmationRequired => "Confirmation required",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Invalid token",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::StaffRequired => "Staff role required",
            ErrorCode::NotOwner => "Only the author or staff may do this",
            ErrorCode::CategoryViewDenied => "You cannot view this category",
            ErrorCode::CategoryCreateDenied => "You cannot create threads in this category",
            ErrorCode::CategoryReplyDenied => "You cannot reply in this category",

            // Role
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::RoleNameExists => "Role name already exists",
            ErrorCode::RoleIsSystem => "System roles cannot be modified",
            ErrorCode::PermissionNotFound => "Permission not found",
            ErrorCode::InvalidPermissionField => "Unknown category permission field",

            // Forum
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::PostNotFound => "Post not found",
            ErrorCode::PostLocked => "Post is locked",
            ErrorCode::ReplyNotFound => "Reply not found",

            // Notification
            ErrorCode::NotificationNotFound => "Notification not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::SystemBusy => "System busy, please retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            9 => Ok(ErrorCode::ConfirmationRequired),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::StaffRequired),
            2003 => Ok(ErrorCode::NotOwner),
            2101 => Ok(ErrorCode::CategoryViewDenied),
            2102 => Ok(ErrorCode::CategoryCreateDenied),
            2103 => Ok(ErrorCode::CategoryReplyDenied),

            3001 => Ok(ErrorCode::RoleNotFound),
            3002 => Ok(ErrorCode::RoleNameExists),
            3003 => Ok(ErrorCode::RoleIsSystem),
            3101 => Ok(ErrorCode::PermissionNotFound),
            3201 => Ok(ErrorCode::InvalidPermissionField),

            4001 => Ok(ErrorCode::CategoryNotFound),
            4101 => Ok(ErrorCode::PostNotFound),
            4102 => Ok(ErrorCode::PostLocked),
            4201 => Ok(ErrorCode::ReplyNotFound),

            5001 => Ok(ErrorCode::NotificationNotFound),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ConfirmationRequired.code(), 9);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::CategoryReplyDenied.code(), 2103);
        assert_eq!(ErrorCode::RoleIsSystem.code(), 3003);
        assert_eq!(ErrorCode::PostLocked.code(), 4102);
        assert_eq!(ErrorCode::NotificationNotFound.code(), 5001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::RoleNotFound.is_success());
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let all = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidFormat,
            ErrorCode::RequiredField,
            ErrorCode::ConfirmationRequired,
            ErrorCode::NotAuthenticated,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::PermissionDenied,
            ErrorCode::StaffRequired,
            ErrorCode::NotOwner,
            ErrorCode::CategoryViewDenied,
            ErrorCode::CategoryCreateDenied,
            ErrorCode::CategoryReplyDenied,
            ErrorCode::RoleNotFound,
            ErrorCode::RoleNameExists,
            ErrorCode::RoleIsSystem,
            ErrorCode::PermissionNotFound,
            ErrorCode::InvalidPermissionField,
            ErrorCode::CategoryNotFound,
            ErrorCode::PostNotFound,
            ErrorCode::PostLocked,
            ErrorCode::ReplyNotFound,
            ErrorCode::NotificationNotFound,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::ConfigError,
            ErrorCode::SystemBusy,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(8), Err(InvalidErrorCode(8)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::RoleIsSystem).unwrap(), "3003");
        let code: ErrorCode = serde_json::from_str("4102").unwrap();
        assert_eq!(code, ErrorCode::PostLocked);
        assert!(serde_json::from_str::<ErrorCode>("999").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::RoleNotFound), "3001");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::RoleIsSystem.message(), "System roles cannot be modified");
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }
}

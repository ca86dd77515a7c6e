//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Role names, display names, category names
pub const MAX_NAME_LEN: usize = 100;

/// Badge text shown next to a username
pub const MAX_BADGE_LEN: usize = 32;

/// Thread titles
pub const MAX_TITLE_LEN: usize = 200;

/// Thread bodies and replies
pub const MAX_CONTENT_LEN: usize = 20_000;

/// Avatar URLs
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// `#rrggbb`
pub fn validate_color(value: &str) -> Result<(), AppError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::validation(format!(
            "color must be a #rrggbb hex value, got '{value}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text() {
        assert!(validate_required_text("Helper", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(101), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn optional_text() {
        assert!(validate_optional_text(&None, "badge", MAX_BADGE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(33)), "badge", MAX_BADGE_LEN).is_err());
    }

    #[test]
    fn colors() {
        assert!(validate_color("#6366f1").is_ok());
        assert!(validate_color("#ABCDEF").is_ok());
        assert!(validate_color("6366f1").is_err());
        assert!(validate_color("#63f").is_err());
        assert!(validate_color("#zzzzzz").is_err());
    }
}

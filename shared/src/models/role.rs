//! Role Model

use serde::{Deserialize, Serialize};

/// Role entity (论坛角色)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Role {
    pub id: i64,
    /// Unique machine name, normalized by [`normalize_role_name`]
    pub name: String,
    pub display_name: String,
    /// Badge color, e.g. `#6366f1`
    pub color: String,
    pub badge_text: Option<String>,
    /// Higher value wins when picking the primary role
    pub priority: i64,
    pub is_staff: bool,
    /// System roles cannot be edited or deleted
    pub is_system: bool,
    pub created_at: i64,
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreate {
    pub name: String,
    pub display_name: String,
    pub color: Option<String>,
    pub badge_text: Option<String>,
    pub priority: Option<i64>,
    pub is_staff: Option<bool>,
}

/// Update role payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub color: Option<String>,
    pub badge_text: Option<String>,
    pub priority: Option<i64>,
    pub is_staff: Option<bool>,
}

pub const DEFAULT_ROLE_COLOR: &str = "#6366f1";

/// Name of the fallback role used for users without assignments
pub const MEMBER_ROLE: &str = "member";

/// Lower-case the name and collapse whitespace runs into `_`.
pub fn normalize_role_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_role_name() {
        assert_eq!(normalize_role_name("Helper"), "helper");
        assert_eq!(normalize_role_name("  Senior   Helper "), "senior_helper");
        assert_eq!(normalize_role_name("VIP\tMember"), "vip_member");
        assert_eq!(normalize_role_name("   "), "");
    }
}

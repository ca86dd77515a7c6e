//! Category Permission Overlay Models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-(category, role) overlay row. No row means every flag is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryPermission {
    pub id: i64,
    pub category_id: i64,
    pub role_id: i64,
    pub can_view: bool,
    pub can_create_thread: bool,
    pub can_reply: bool,
}

impl CategoryPermission {
    pub fn get(&self, field: PermissionField) -> bool {
        match field {
            PermissionField::CanView => self.can_view,
            PermissionField::CanCreateThread => self.can_create_thread,
            PermissionField::CanReply => self.can_reply,
        }
    }
}

/// One of the three overlay flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionField {
    CanView,
    CanCreateThread,
    CanReply,
}

impl PermissionField {
    pub const ALL: [PermissionField; 3] = [
        PermissionField::CanView,
        PermissionField::CanCreateThread,
        PermissionField::CanReply,
    ];

    /// Column name in `category_permission`
    pub const fn as_str(&self) -> &'static str {
        match self {
            PermissionField::CanView => "can_view",
            PermissionField::CanCreateThread => "can_create_thread",
            PermissionField::CanReply => "can_reply",
        }
    }
}

impl fmt::Display for PermissionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "can_view" => Ok(PermissionField::CanView),
            "can_create_thread" => Ok(PermissionField::CanCreateThread),
            "can_reply" => Ok(PermissionField::CanReply),
            other => Err(format!("unknown category permission field: {other}")),
        }
    }
}

/// Toggle request: set `field` to `value` for a (category, role) pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryPermissionToggle {
    pub field: PermissionField,
    pub value: bool,
}

/// Effective access of a caller to one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAccess {
    pub can_view: bool,
    pub can_create_thread: bool,
    pub can_reply: bool,
}

impl CategoryAccess {
    pub const ALLOW_ALL: CategoryAccess = CategoryAccess {
        can_view: true,
        can_create_thread: true,
        can_reply: true,
    };

    pub fn allows(&self, field: PermissionField) -> bool {
        match field {
            PermissionField::CanView => self.can_view,
            PermissionField::CanCreateThread => self.can_create_thread,
            PermissionField::CanReply => self.can_reply,
        }
    }
}

impl Default for CategoryAccess {
    fn default() -> Self {
        Self::ALLOW_ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_parse_and_display() {
        for field in PermissionField::ALL {
            assert_eq!(field.as_str().parse::<PermissionField>().unwrap(), field);
        }
        assert!("can_delete".parse::<PermissionField>().is_err());
    }

    #[test]
    fn test_field_serde_matches_column() {
        let json = serde_json::to_string(&PermissionField::CanCreateThread).unwrap();
        assert_eq!(json, "\"can_create_thread\"");
    }

    #[test]
    fn test_access_default_allows_everything() {
        let access = CategoryAccess::default();
        assert!(PermissionField::ALL.iter().all(|f| access.allows(*f)));
    }
}

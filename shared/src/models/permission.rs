//! Permission & Role-Permission Matrix Models

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Permission entity (seeded, read-only over the API)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    /// Grouping label only (e.g. "admin", "moderation")
    pub category: String,
}

/// Grant row: presence means the role holds the permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RolePermission {
    pub role_id: i64,
    pub permission_id: i64,
}

/// Permissions sharing one category label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub category: String,
    pub permissions: Vec<Permission>,
}

/// Everything the matrix editor needs in one payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionMatrix {
    pub roles: Vec<Role>,
    pub groups: Vec<PermissionGroup>,
    pub grants: Vec<RolePermission>,
}

impl PermissionMatrix {
    pub fn is_granted(&self, role_id: i64, permission_id: i64) -> bool {
        self.grants
            .iter()
            .any(|g| g.role_id == role_id && g.permission_id == permission_id)
    }
}

/// Result of a matrix toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantToggled {
    pub role_id: i64,
    pub permission_id: i64,
    /// Membership after the toggle
    pub granted: bool,
}

/// Group permissions by category, keeping input order inside each group.
///
/// Input is expected sorted by category (the repository orders by
/// `category, name`), so adjacent runs form the groups.
pub fn group_by_category(permissions: Vec<Permission>) -> Vec<PermissionGroup> {
    let mut groups: Vec<PermissionGroup> = Vec::new();
    for p in permissions {
        match groups.last_mut() {
            Some(g) if g.category == p.category => g.permissions.push(p),
            _ => groups.push(PermissionGroup {
                category: p.category.clone(),
                permissions: vec![p],
            }),
        }
    }
    groups
}

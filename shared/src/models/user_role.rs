//! User-Role Assignment Models

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Assignment row (user_id, role_id) is unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserRole {
    pub id: i64,
    pub user_id: String,
    pub role_id: i64,
    pub assigned_by: Option<String>,
    pub created_at: i64,
}

/// Replace a user's full role set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRolesUpdate {
    pub role_ids: Vec<i64>,
}

/// User listing row for the assignment screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithRoles {
    pub user_id: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub roles: Vec<Role>,
}

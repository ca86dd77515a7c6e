//! Permission Definitions
//!
//! Names of the seeded permissions. Grants live in `role_permission`; these
//! constants are what route guards ask for.

/// 进入管理后台
pub const ACCESS_ADMIN_PANEL: &str = "access_admin_panel";
pub const MANAGE_ROLES: &str = "manage_roles";
pub const MANAGE_PERMISSIONS: &str = "manage_permissions";
pub const ASSIGN_ROLES: &str = "assign_roles";
pub const MANAGE_CATEGORIES: &str = "manage_categories";
pub const MODERATE_POSTS: &str = "moderate_posts";
pub const VIEW_LOGS: &str = "view_logs";
/// 删除任意帖子/回复
pub const DELETE_POST: &str = "delete_post";

/// Every permission seeded by the initial migration
pub const ALL_PERMISSIONS: &[&str] = &[
    ACCESS_ADMIN_PANEL,
    MANAGE_ROLES,
    MANAGE_PERMISSIONS,
    ASSIGN_ROLES,
    MANAGE_CATEGORIES,
    MODERATE_POSTS,
    VIEW_LOGS,
    DELETE_POST,
];

/// Validate if a permission string is known
pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{permission, test_support};

    #[tokio::test]
    async fn constants_match_seeded_rows() {
        let pool = test_support::pool().await;
        let mut seeded: Vec<String> = permission::find_all(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        seeded.sort();

        let mut known: Vec<&str> = ALL_PERMISSIONS.to_vec();
        known.sort();
        assert_eq!(seeded, known);
        assert!(is_valid_permission("view_logs"));
        assert!(!is_valid_permission("all"));
    }
}

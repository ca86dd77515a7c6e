//! Permission Resolver

use serde::Serialize;
use shared::models::{MEMBER_ROLE, Role};
use sqlx::SqlitePool;
use std::collections::BTreeSet;

use crate::auth::permissions::ACCESS_ADMIN_PANEL;
use crate::db::repository::{RepoResult, permission, role};

/// Effective roles and permissions of one caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedPermissions {
    pub roles: Vec<Role>,
    pub permissions: BTreeSet<String>,
    pub primary_role: Option<Role>,
}

impl ResolvedPermissions {
    /// Resolution for an anonymous caller
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_staff(&self) -> bool {
        self.roles.iter().any(|r| r.is_staff)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has_permission(p))
    }

    pub fn can_access_admin_panel(&self) -> bool {
        self.has_permission(ACCESS_ADMIN_PANEL)
    }

    pub fn role_ids(&self) -> Vec<i64> {
        self.roles.iter().map(|r| r.id).collect()
    }
}

/// Highest priority wins; equal priorities fall back to the lexically smallest name
pub fn primary_role(roles: &[Role]) -> Option<&Role> {
    roles.iter().max_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| b.name.cmp(&a.name))
    })
}

/// Loads roles and grants from the store
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    pool: SqlitePool,
}

impl PermissionResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve the caller's permissions.
    ///
    /// Never fails: a store error is logged and the caller is treated as
    /// having no roles and no permissions.
    pub async fn resolve(&self, user_id: Option<&str>) -> ResolvedPermissions {
        let Some(user_id) = user_id else {
            return ResolvedPermissions::empty();
        };

        match self.load(user_id).await {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to resolve permissions");
                ResolvedPermissions::empty()
            }
        }
    }

    async fn load(&self, user_id: &str) -> RepoResult<ResolvedPermissions> {
        let mut roles = role::find_for_user(&self.pool, user_id).await?;

        // 未分配角色的用户视为 member
        if roles.is_empty()
            && let Some(member) = role::find_by_name(&self.pool, MEMBER_ROLE).await?
        {
            roles.push(member);
        }

        let role_ids: Vec<i64> = roles.iter().map(|r| r.id).collect();
        let permissions = permission::names_for_roles(&self.pool, &role_ids)
            .await?
            .into_iter()
            .collect();
        let primary_role = primary_role(&roles).cloned();

        Ok(ResolvedPermissions {
            roles,
            permissions,
            primary_role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{role_permission, test_support, user_role};
    use shared::models::RoleCreate;

    fn role(id: i64, name: &str, priority: i64) -> Role {
        Role {
            id,
            name: name.into(),
            display_name: name.into(),
            color: "#000000".into(),
            badge_text: None,
            priority,
            is_staff: false,
            is_system: false,
            created_at: 0,
        }
    }

    async fn assign(pool: &SqlitePool, user_id: &str, role_ids: &[i64]) {
        let mut conn = pool.acquire().await.unwrap();
        user_role::insert_many(&mut conn, user_id, role_ids, "test")
            .await
            .unwrap();
    }

    #[test]
    fn primary_role_prefers_priority_then_name() {
        let roles = vec![role(1, "zeta", 10), role(2, "alpha", 10), role(3, "low", 1)];
        assert_eq!(primary_role(&roles).unwrap().name, "alpha");

        let roles = vec![role(1, "zeta", 20), role(2, "alpha", 10)];
        assert_eq!(primary_role(&roles).unwrap().name, "zeta");

        assert!(primary_role(&[]).is_none());
    }

    #[tokio::test]
    async fn anonymous_resolves_to_nothing() {
        let pool = test_support::pool().await;
        let resolved = PermissionResolver::new(pool).resolve(None).await;
        assert_eq!(resolved, ResolvedPermissions::empty());
        assert!(!resolved.is_staff());
    }

    #[tokio::test]
    async fn unassigned_user_falls_back_to_member() {
        let pool = test_support::pool().await;
        let resolved = PermissionResolver::new(pool).resolve(Some("u1")).await;

        assert_eq!(resolved.roles.len(), 1);
        assert_eq!(resolved.roles[0].name, MEMBER_ROLE);
        assert_eq!(resolved.primary_role.as_ref().unwrap().name, MEMBER_ROLE);
        assert!(resolved.permissions.is_empty());
        assert!(!resolved.is_staff());
        assert!(!resolved.can_access_admin_panel());
    }

    #[tokio::test]
    async fn missing_member_role_means_no_permissions() {
        let pool = test_support::pool().await;
        sqlx::query("DELETE FROM role WHERE name = 'member'")
            .execute(&pool)
            .await
            .unwrap();

        let resolved = PermissionResolver::new(pool).resolve(Some("u1")).await;
        assert!(resolved.roles.is_empty());
        assert!(resolved.permissions.is_empty());
        assert!(resolved.primary_role.is_none());
    }

    #[tokio::test]
    async fn permissions_are_the_union_of_roles() {
        let pool = test_support::pool().await;
        // support (2) + member (3)
        assign(&pool, "u1", &[2, 3]).await;
        let support = PermissionResolver::new(pool.clone()).resolve(Some("u1")).await;
        let names: Vec<_> = support.permissions.iter().map(String::as_str).collect();
        assert_eq!(
            names,
            ["access_admin_panel", "delete_post", "moderate_posts", "view_logs"]
        );
        assert_eq!(support.primary_role.unwrap().name, "support");

        assign(&pool, "u2", &[1, 2]).await;
        let admin = PermissionResolver::new(pool).resolve(Some("u2")).await;
        assert_eq!(admin.permissions.len(), 8);
        assert_eq!(admin.primary_role.as_ref().unwrap().name, "admin");
        assert!(admin.is_staff());
        assert!(admin.has_any_permission(&["nope", "manage_roles"]));
        assert!(!admin.has_permission("nope"));
    }

    #[tokio::test]
    async fn custom_staff_role_outranks_member() {
        let pool = test_support::pool().await;
        let helper = {
            let mut conn = pool.acquire().await.unwrap();
            let helper = role::create(
                &mut conn,
                &RoleCreate {
                    name: "helper".into(),
                    display_name: "Helper".into(),
                    color: None,
                    badge_text: None,
                    priority: Some(10),
                    is_staff: Some(true),
                },
            )
            .await
            .unwrap();
            // delete_post is permission 8
            role_permission::grant(&mut conn, helper.id, 8).await.unwrap();
            helper
        };
        assign(&pool, "u1", &[helper.id, 3]).await;

        let resolved = PermissionResolver::new(pool).resolve(Some("u1")).await;
        assert_eq!(resolved.primary_role.as_ref().unwrap().display_name, "Helper");
        assert!(resolved.is_staff());
        assert!(resolved.has_permission("delete_post"));
        assert_eq!(resolved.permissions.len(), 1);
        assert!(!resolved.can_access_admin_panel());
    }

    #[tokio::test]
    async fn equal_priority_tie_breaks_by_name() {
        let pool = test_support::pool().await;
        let (a, b) = {
            let mut conn = pool.acquire().await.unwrap();
            let mk = |name: &str| RoleCreate {
                name: name.into(),
                display_name: name.into(),
                color: None,
                badge_text: None,
                priority: Some(50),
                is_staff: None,
            };
            let b = role::create(&mut conn, &mk("beta")).await.unwrap();
            let a = role::create(&mut conn, &mk("alpha")).await.unwrap();
            (a, b)
        };
        assign(&pool, "u1", &[b.id, a.id]).await;

        let resolved = PermissionResolver::new(pool).resolve(Some("u1")).await;
        assert_eq!(resolved.primary_role.unwrap().id, a.id);
    }

    #[tokio::test]
    async fn store_failure_degrades_to_empty() {
        let pool = test_support::pool().await;
        pool.close().await;
        let resolved = PermissionResolver::new(pool).resolve(Some("u1")).await;
        assert_eq!(resolved, ResolvedPermissions::empty());
    }
}

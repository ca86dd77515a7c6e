//! 用户角色分配

use shared::models::{UserRole, UserWithRoles};
use sqlx::SqlitePool;
use std::collections::HashMap;

use super::{begin, commit};
use crate::audit::{self, ModerationEntry};
use crate::db::repository::{profile, role, user_role};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Profiles (optionally filtered by display name) with their assigned roles
pub async fn list_users(pool: &SqlitePool, search: Option<&str>) -> AppResult<Vec<UserWithRoles>> {
    let profiles = profile::search(pool, search).await?;
    let roles = role::find_all(pool).await?;
    let assignments = user_role::find_all(pool).await?;

    let mut by_user: HashMap<&str, Vec<i64>> = HashMap::new();
    for UserRole { user_id, role_id, .. } in &assignments {
        by_user.entry(user_id.as_str()).or_default().push(*role_id);
    }

    let users = profiles
        .into_iter()
        .map(|p| {
            let assigned = by_user.get(p.user_id.as_str());
            // `roles` is already ordered by priority
            let user_roles = roles
                .iter()
                .filter(|r| assigned.is_some_and(|ids| ids.contains(&r.id)))
                .cloned()
                .collect();
            UserWithRoles {
                user_id: p.user_id,
                display_name: p.display_name,
                avatar_url: p.avatar_url,
                roles: user_roles,
            }
        })
        .collect();
    Ok(users)
}

/// Replace every role of `user_id` with `role_ids`
///
/// An empty list leaves the user with no explicit roles (the member
/// fallback then applies). Returns the stored role ids.
pub async fn replace(
    pool: &SqlitePool,
    actor_id: &str,
    user_id: &str,
    role_ids: &[i64],
) -> AppResult<Vec<i64>> {
    let mut ids = Vec::with_capacity(role_ids.len());
    for id in role_ids {
        if !ids.contains(id) {
            ids.push(*id);
        }
    }

    let mut tx = begin(pool).await?;
    for id in &ids {
        if role::find_by_id(&mut *tx, *id).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::RoleNotFound,
                format!("Role {id} not found"),
            ));
        }
    }

    let removed = user_role::delete_for_user(&mut tx, user_id).await?;
    if !ids.is_empty() {
        user_role::insert_many(&mut tx, user_id, &ids, actor_id).await?;
    }
    audit::record(&mut tx, actor_id, &ModerationEntry::user_roles_updated(user_id, &ids)).await?;
    commit(tx).await?;

    tracing::info!(
        actor_id = %actor_id,
        user_id = %user_id,
        removed,
        assigned = ids.len(),
        "User roles replaced"
    );
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::PermissionResolver;
    use crate::services::test_support::{logs, pool};
    use serde_json::json;
    use shared::models::ProfileUpdate;

    async fn add_profile(pool: &SqlitePool, user_id: &str, name: &str) {
        profile::upsert(
            pool,
            user_id,
            &ProfileUpdate {
                display_name: Some(name.into()),
                avatar_url: None,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn replace_overwrites_previous_assignment() {
        let pool = pool().await;
        replace(&pool, "admin", "u1", &[1]).await.unwrap();
        let stored = replace(&pool, "admin", "u1", &[2, 3, 2]).await.unwrap();
        assert_eq!(stored, vec![2, 3]);
        assert_eq!(user_role::role_ids_for_user(&pool, "u1").await.unwrap(), vec![2, 3]);

        let logs = logs(&pool).await;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].log.action, "Updated user roles");
        assert_eq!(logs[0].log.target_type, "user");
        assert_eq!(logs[0].log.target_id, "u1");
        assert_eq!(logs[0].log.details, json!({ "roles": [2, 3] }));
    }

    #[tokio::test]
    async fn empty_set_clears_roles_and_still_logs() {
        let pool = pool().await;
        replace(&pool, "admin", "u1", &[2]).await.unwrap();
        replace(&pool, "admin", "u1", &[]).await.unwrap();
        assert!(user_role::role_ids_for_user(&pool, "u1").await.unwrap().is_empty());
        assert_eq!(logs(&pool).await[0].log.details, json!({ "roles": [] }));
    }

    #[tokio::test]
    async fn unknown_role_keeps_previous_state() {
        let pool = pool().await;
        replace(&pool, "admin", "u1", &[2]).await.unwrap();
        let err = replace(&pool, "admin", "u1", &[3, 404]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleNotFound);
        assert_eq!(user_role::role_ids_for_user(&pool, "u1").await.unwrap(), vec![2]);
        assert_eq!(logs(&pool).await.len(), 1);
    }

    #[tokio::test]
    async fn saving_the_same_set_keeps_resolution() {
        let pool = pool().await;
        replace(&pool, "admin", "u1", &[2, 3]).await.unwrap();
        let resolver = PermissionResolver::new(pool.clone());
        let before = resolver.resolve(Some("u1")).await;

        replace(&pool, "admin", "u1", &[3, 2]).await.unwrap();
        let after = resolver.resolve(Some("u1")).await;

        assert_eq!(after.permissions, before.permissions);
        assert_eq!(after.primary_role, before.primary_role);
        assert_eq!(after.is_staff(), before.is_staff());
        assert!(after.has_permission("delete_post"));
        assert_eq!(logs(&pool).await.len(), 2);
    }

    #[tokio::test]
    async fn list_users_attaches_roles() {
        let pool = pool().await;
        add_profile(&pool, "u1", "Alice").await;
        add_profile(&pool, "u2", "Bob").await;
        replace(&pool, "admin", "u1", &[3, 1]).await.unwrap();

        let users = list_users(&pool, None).await.unwrap();
        assert_eq!(users.len(), 2);
        let alice = &users[0];
        assert_eq!(alice.display_name.as_deref(), Some("Alice"));
        let names: Vec<_> = alice.roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["admin", "member"]);
        assert!(users[1].roles.is_empty());

        let found = list_users(&pool, Some("bo")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id, "u2");
    }
}

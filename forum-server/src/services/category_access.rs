//! 分类权限覆盖
//!
//! A row for (category, role) narrows what that role may do in the
//! category. No row means everything is allowed, and a caller is allowed a
//! flag as soon as one of their roles allows it. Callers without roles are
//! held to the `member` rows.

use shared::models::{
    CategoryAccess, CategoryPermission, CategoryPermissionToggle, MEMBER_ROLE, PermissionField,
};
use sqlx::SqlitePool;

use super::{begin, commit};
use crate::audit::{self, ModerationEntry};
use crate::db::repository::{category_permission, forum_category, role};
use crate::permissions::ResolvedPermissions;
use crate::utils::{AppError, AppResult, ErrorCode};

pub async fn list(pool: &SqlitePool) -> AppResult<Vec<CategoryPermission>> {
    Ok(category_permission::find_all(pool).await?)
}

/// Set one flag of a (category, role) pair to the requested value
pub async fn toggle(
    pool: &SqlitePool,
    actor_id: &str,
    category_id: i64,
    role_id: i64,
    toggle: CategoryPermissionToggle,
) -> AppResult<CategoryPermission> {
    let mut tx = begin(pool).await?;

    if forum_category::find_by_id(&mut *tx, category_id).await?.is_none() {
        return Err(AppError::with_message(
            ErrorCode::CategoryNotFound,
            format!("Category {category_id} not found"),
        ));
    }
    if role::find_by_id(&mut *tx, role_id).await?.is_none() {
        return Err(AppError::with_message(
            ErrorCode::RoleNotFound,
            format!("Role {role_id} not found"),
        ));
    }

    let row =
        category_permission::set_field(&mut tx, category_id, role_id, toggle.field, toggle.value)
            .await?;
    audit::record(
        &mut tx,
        actor_id,
        &ModerationEntry::category_permission_updated(
            category_id,
            role_id,
            toggle.field,
            toggle.value,
        ),
    )
    .await?;
    commit(tx).await?;

    tracing::info!(
        actor_id = %actor_id,
        category_id,
        role_id,
        field = %toggle.field,
        value = toggle.value,
        "Category permission updated"
    );
    Ok(row)
}

/// Effective access of a role set in one category
///
/// An empty role set only passes flags that no row for the category
/// restricts.
pub fn effective_access(
    role_ids: &[i64],
    rows: &[CategoryPermission],
    category_id: i64,
) -> CategoryAccess {
    let in_category = || rows.iter().filter(|r| r.category_id == category_id);

    let allows = |field: PermissionField| {
        if role_ids.is_empty() {
            return in_category().all(|r| r.get(field));
        }
        role_ids.iter().any(|role_id| {
            in_category()
                .find(|r| r.role_id == *role_id)
                .is_none_or(|r| r.get(field))
        })
    };

    CategoryAccess {
        can_view: allows(PermissionField::CanView),
        can_create_thread: allows(PermissionField::CanCreateThread),
        can_reply: allows(PermissionField::CanReply),
    }
}

/// Overlay rows that apply to one caller
///
/// A caller without roles (anonymous, or a resolution that failed) is
/// evaluated as `member`. Without a `member` role every row applies.
#[derive(Debug, Clone, Default)]
pub struct CallerOverlay {
    role_ids: Vec<i64>,
    rows: Vec<CategoryPermission>,
}

impl CallerOverlay {
    pub async fn load(pool: &SqlitePool, caller: &ResolvedPermissions) -> AppResult<Self> {
        let mut role_ids = caller.role_ids();
        if role_ids.is_empty()
            && let Some(member) = role::find_by_name(pool, MEMBER_ROLE).await?
        {
            role_ids.push(member.id);
        }

        let rows = if role_ids.is_empty() {
            category_permission::find_all(pool).await?
        } else {
            category_permission::find_for_roles(pool, &role_ids).await?
        };
        Ok(Self { role_ids, rows })
    }

    pub fn access(&self, category_id: i64) -> CategoryAccess {
        effective_access(&self.role_ids, &self.rows, category_id)
    }
}

pub async fn access_for(
    pool: &SqlitePool,
    caller: &ResolvedPermissions,
    category_id: i64,
) -> AppResult<CategoryAccess> {
    Ok(CallerOverlay::load(pool, caller).await?.access(category_id))
}

/// Fail with the matching error code unless `field` is allowed
pub fn ensure(access: &CategoryAccess, field: PermissionField) -> AppResult<()> {
    if access.allows(field) {
        return Ok(());
    }
    let code = match field {
        PermissionField::CanView => ErrorCode::CategoryViewDenied,
        PermissionField::CanCreateThread => ErrorCode::CategoryCreateDenied,
        PermissionField::CanReply => ErrorCode::CategoryReplyDenied,
    };
    Err(AppError::forbidden(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::PermissionResolver;
    use crate::services::test_support::{logs, pool};

    fn row(category_id: i64, role_id: i64, view: bool, create: bool, reply: bool) -> CategoryPermission {
        CategoryPermission {
            id: category_id * 100 + role_id,
            category_id,
            role_id,
            can_view: view,
            can_create_thread: create,
            can_reply: reply,
        }
    }

    #[test]
    fn no_rows_allows_everything() {
        assert_eq!(effective_access(&[3], &[], 1), CategoryAccess::ALLOW_ALL);
        assert_eq!(effective_access(&[], &[], 1), CategoryAccess::ALLOW_ALL);
    }

    #[test]
    fn empty_role_set_honours_every_restriction() {
        let rows = [row(1, 3, true, false, true), row(1, 10, true, true, false)];
        let access = effective_access(&[], &rows, 1);
        assert!(access.can_view);
        assert!(!access.can_create_thread);
        assert!(!access.can_reply);
        assert_eq!(effective_access(&[], &rows, 2), CategoryAccess::ALLOW_ALL);
    }

    #[test]
    fn single_role_row_applies() {
        let rows = [row(1, 3, true, false, true)];
        let access = effective_access(&[3], &rows, 1);
        assert!(access.can_view);
        assert!(!access.can_create_thread);
        assert!(access.can_reply);
        // other categories untouched
        assert_eq!(effective_access(&[3], &rows, 2), CategoryAccess::ALLOW_ALL);
    }

    #[test]
    fn any_role_allowing_wins() {
        // role 10 has a restrictive row, role 3 has none
        let rows = [row(2, 10, false, false, false)];
        assert_eq!(effective_access(&[10, 3], &rows, 2), CategoryAccess::ALLOW_ALL);
        assert!(!effective_access(&[10], &rows, 2).can_view);

        let rows = [row(2, 10, false, false, false), row(2, 3, false, true, false)];
        let access = effective_access(&[10, 3], &rows, 2);
        assert!(!access.can_view);
        assert!(access.can_create_thread);
        assert!(!access.can_reply);
    }

    #[test]
    fn ensure_maps_error_codes() {
        let access = CategoryAccess {
            can_view: true,
            can_create_thread: false,
            can_reply: false,
        };
        assert!(ensure(&access, PermissionField::CanView).is_ok());
        assert_eq!(
            ensure(&access, PermissionField::CanCreateThread).unwrap_err().code,
            ErrorCode::CategoryCreateDenied
        );
        assert_eq!(
            ensure(&access, PermissionField::CanReply).unwrap_err().code,
            ErrorCode::CategoryReplyDenied
        );
    }

    #[tokio::test]
    async fn toggle_inserts_then_patches_and_logs() {
        let pool = pool().await;
        let toggle_view = |value| CategoryPermissionToggle {
            field: PermissionField::CanView,
            value,
        };

        let inserted = toggle(&pool, "admin", 2, 3, toggle_view(false)).await.unwrap();
        assert!(!inserted.can_view);
        assert!(inserted.can_create_thread && inserted.can_reply);

        let patched = toggle(&pool, "admin", 2, 3, toggle_view(true)).await.unwrap();
        assert_eq!(patched.id, inserted.id);
        assert!(patched.can_view);

        let logs = logs(&pool).await;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].log.action, "Updated category permission: can_view");
        assert_eq!(logs[0].log.target_type, "category");
        assert_eq!(logs[0].log.target_id, "2");
        assert_eq!(logs[0].log.details["role_id"], 3);
        assert_eq!(logs[0].log.details["value"], true);
    }

    #[tokio::test]
    async fn toggle_unknown_category_or_role() {
        let pool = pool().await;
        let t = CategoryPermissionToggle {
            field: PermissionField::CanReply,
            value: false,
        };
        assert_eq!(
            toggle(&pool, "admin", 99, 3, t).await.unwrap_err().code,
            ErrorCode::CategoryNotFound
        );
        assert_eq!(
            toggle(&pool, "admin", 1, 99, t).await.unwrap_err().code,
            ErrorCode::RoleNotFound
        );
        assert!(logs(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn seeded_announcements_block_member_threads() {
        let pool = pool().await;
        let member = ResolvedPermissions {
            roles: vec![role::find_by_id(&pool, 3).await.unwrap().unwrap()],
            ..Default::default()
        };
        let access = access_for(&pool, &member, 1).await.unwrap();
        assert!(access.can_view);
        assert!(!access.can_create_thread);
        assert!(access.can_reply);

        let anonymous = ResolvedPermissions::empty();
        assert_eq!(access_for(&pool, &anonymous, 1).await.unwrap(), access);
    }

    #[tokio::test]
    async fn roleless_callers_are_held_to_member_rows() {
        let pool = pool().await;
        let hide = CategoryPermissionToggle {
            field: PermissionField::CanView,
            value: false,
        };
        toggle(&pool, "admin", 3, 3, hide).await.unwrap();

        // resolution against an unreachable store comes back empty
        let broken = crate::services::test_support::pool().await;
        broken.close().await;
        let degraded = PermissionResolver::new(broken.clone())
            .resolve(Some("u1"))
            .await;
        assert!(degraded.roles.is_empty());

        assert!(!access_for(&pool, &degraded, 3).await.unwrap().can_view);
        assert!(access_for(&pool, &degraded, 2).await.unwrap().can_view);
        assert!(access_for(&broken, &degraded, 3).await.is_err());
    }

    #[tokio::test]
    async fn without_member_role_any_restriction_applies() {
        let pool = pool().await;
        let hide = CategoryPermissionToggle {
            field: PermissionField::CanReply,
            value: false,
        };
        toggle(&pool, "admin", 2, 2, hide).await.unwrap();
        sqlx::query("DELETE FROM role WHERE name = 'member'")
            .execute(&pool)
            .await
            .unwrap();

        let anonymous = ResolvedPermissions::empty();
        let access = access_for(&pool, &anonymous, 2).await.unwrap();
        assert!(access.can_view);
        assert!(!access.can_reply);
    }
}

//! 角色与权限矩阵

use shared::models::{
    GrantToggled, Permission, PermissionMatrix, Role, RoleCreate, RoleUpdate, group_by_category,
    normalize_role_name,
};
use sqlx::SqlitePool;

use super::{begin, commit};
use crate::audit::{self, ModerationEntry};
use crate::db::repository::{RepoError, permission, role, role_permission};
use crate::utils::validation::{
    MAX_BADGE_LEN, MAX_NAME_LEN, validate_color, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Roles by priority, highest first
pub async fn list(pool: &SqlitePool) -> AppResult<Vec<Role>> {
    Ok(role::find_all(pool).await?)
}

pub async fn list_permissions(pool: &SqlitePool) -> AppResult<Vec<Permission>> {
    Ok(permission::find_all(pool).await?)
}

/// Roles, permissions grouped by category, and every grant
pub async fn matrix(pool: &SqlitePool) -> AppResult<PermissionMatrix> {
    let roles = role::find_all(pool).await?;
    let permissions = permission::find_all(pool).await?;
    let grants = role_permission::find_all(pool).await?;
    Ok(PermissionMatrix {
        roles,
        groups: group_by_category(permissions),
        grants,
    })
}

pub async fn create(pool: &SqlitePool, actor_id: &str, data: RoleCreate) -> AppResult<Role> {
    let data = prepare_create(data)?;

    let mut tx = begin(pool).await?;
    let r = role::create(&mut tx, &data)
        .await
        .map_err(|e| name_conflict(e, &data.name))?;
    audit::record(&mut tx, actor_id, &ModerationEntry::role_created(&r)).await?;
    commit(tx).await?;

    tracing::info!(actor_id = %actor_id, role_id = r.id, role_name = %r.name, "Role created");
    Ok(r)
}

/// 系统角色不可修改
pub async fn update(
    pool: &SqlitePool,
    actor_id: &str,
    id: i64,
    data: RoleUpdate,
) -> AppResult<Role> {
    let data = prepare_update(data)?;

    let mut tx = begin(pool).await?;
    let r = role::update(&mut tx, id, &data).await.map_err(|e| match &data.name {
        Some(name) => name_conflict(e, name),
        None => e.into(),
    })?;
    audit::record(&mut tx, actor_id, &ModerationEntry::role_updated(&r)).await?;
    commit(tx).await?;

    tracing::info!(actor_id = %actor_id, role_id = r.id, "Role updated");
    Ok(r)
}

/// Delete a custom role. `confirmed` must be set by the caller explicitly.
///
/// Assignments, grants and category overlay rows of the role are removed
/// with it.
pub async fn delete(pool: &SqlitePool, actor_id: &str, id: i64, confirmed: bool) -> AppResult<Role> {
    if !confirmed {
        return Err(AppError::confirmation_required("delete role")
            .with_detail("role_id", id));
    }

    let mut tx = begin(pool).await?;
    let r = role::delete(&mut tx, id).await?;
    audit::record(&mut tx, actor_id, &ModerationEntry::role_deleted(&r)).await?;
    commit(tx).await?;

    tracing::info!(actor_id = %actor_id, role_id = r.id, role_name = %r.name, "Role deleted");
    Ok(r)
}

/// Grant the permission if the role lacks it, revoke it otherwise
pub async fn toggle_permission(
    pool: &SqlitePool,
    actor_id: &str,
    role_id: i64,
    permission_id: i64,
) -> AppResult<GrantToggled> {
    let mut tx = begin(pool).await?;

    let r = role::find_by_id(&mut *tx, role_id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::RoleNotFound, format!("Role {role_id} not found"))
    })?;
    let p = permission::find_by_id(&mut *tx, permission_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::PermissionNotFound,
                format!("Permission {permission_id} not found"),
            )
        })?;

    let granted = if role_permission::exists(&mut tx, role_id, permission_id).await? {
        role_permission::revoke(&mut tx, role_id, permission_id).await?;
        false
    } else {
        role_permission::grant(&mut tx, role_id, permission_id).await?;
        true
    };

    audit::record(
        &mut tx,
        actor_id,
        &ModerationEntry::permission_toggled(role_id, &p.name, granted),
    )
    .await?;
    commit(tx).await?;

    tracing::info!(
        actor_id = %actor_id,
        role = %r.name,
        permission = %p.name,
        granted,
        "Role permission toggled"
    );

    Ok(GrantToggled {
        role_id,
        permission_id,
        granted,
    })
}

fn prepare_create(mut data: RoleCreate) -> AppResult<RoleCreate> {
    data.name = normalize_role_name(&data.name);
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    data.display_name = data.display_name.trim().to_string();
    validate_required_text(&data.display_name, "display_name", MAX_NAME_LEN)?;
    if let Some(color) = &data.color {
        validate_color(color)?;
    }
    data.badge_text = data
        .badge_text
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty());
    validate_optional_text(&data.badge_text, "badge_text", MAX_BADGE_LEN)?;
    Ok(data)
}

fn prepare_update(mut data: RoleUpdate) -> AppResult<RoleUpdate> {
    if let Some(name) = data.name.take() {
        let name = normalize_role_name(&name);
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        data.name = Some(name);
    }
    if let Some(display_name) = data.display_name.take() {
        let display_name = display_name.trim().to_string();
        validate_required_text(&display_name, "display_name", MAX_NAME_LEN)?;
        data.display_name = Some(display_name);
    }
    if let Some(color) = &data.color {
        validate_color(color)?;
    }
    data.badge_text = data.badge_text.map(|b| b.trim().to_string());
    validate_optional_text(&data.badge_text, "badge_text", MAX_BADGE_LEN)?;
    Ok(data)
}

fn name_conflict(err: RepoError, name: &str) -> AppError {
    match err {
        RepoError::Duplicate(_) => AppError::with_message(
            ErrorCode::RoleNameExists,
            format!("Role '{name}' already exists"),
        ),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{logs, pool};

    const ACTOR: &str = "admin-user";

    fn helper() -> RoleCreate {
        RoleCreate {
            name: "Senior  Helper".into(),
            display_name: " Senior Helper ".into(),
            color: Some("#22c55e".into()),
            badge_text: Some("  ".into()),
            priority: Some(10),
            is_staff: Some(false),
        }
    }

    #[tokio::test]
    async fn create_normalizes_and_logs() {
        let pool = pool().await;
        let r = create(&pool, ACTOR, helper()).await.unwrap();
        assert_eq!(r.name, "senior_helper");
        assert_eq!(r.display_name, "Senior Helper");
        assert_eq!(r.badge_text, None);

        let logs = logs(&pool).await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].log.action, "Created role");
        assert_eq!(logs[0].log.target_type, "role");
        assert_eq!(logs[0].log.target_id, r.id.to_string());
        assert_eq!(logs[0].log.details["role_name"], "Senior Helper");
    }

    #[tokio::test]
    async fn duplicate_name_rejected_without_log() {
        let pool = pool().await;
        create(&pool, ACTOR, helper()).await.unwrap();
        let err = create(&pool, ACTOR, helper()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleNameExists);
        assert_eq!(logs(&pool).await.len(), 1);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let pool = pool().await;
        let mut data = helper();
        data.name = "   ".into();
        assert_eq!(
            create(&pool, ACTOR, data).await.unwrap_err().code,
            ErrorCode::ValidationFailed
        );

        let mut data = helper();
        data.color = Some("green".into());
        assert_eq!(
            create(&pool, ACTOR, data).await.unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        assert!(logs(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn system_role_cannot_be_edited_or_deleted() {
        let pool = pool().await;
        let err = update(&pool, ACTOR, 1, RoleUpdate::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleIsSystem);
        let err = delete(&pool, ACTOR, 3, true).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleIsSystem);
        assert!(logs(&pool).await.is_empty());
        assert_eq!(list(&pool).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_clears_badge_and_logs() {
        let pool = pool().await;
        let mut data = helper();
        data.badge_text = Some("Help".into());
        let r = create(&pool, ACTOR, data).await.unwrap();
        assert_eq!(r.badge_text.as_deref(), Some("Help"));

        let updated = update(
            &pool,
            ACTOR,
            r.id,
            RoleUpdate {
                badge_text: Some(String::new()),
                priority: Some(40),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.badge_text, None);
        assert_eq!(updated.priority, 40);
        assert_eq!(logs(&pool).await[0].log.action, "Updated role");
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let pool = pool().await;
        let r = create(&pool, ACTOR, helper()).await.unwrap();

        let err = delete(&pool, ACTOR, r.id, false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        assert_eq!(list(&pool).await.unwrap().len(), 4);

        let deleted = delete(&pool, ACTOR, r.id, true).await.unwrap();
        assert_eq!(deleted.id, r.id);
        assert_eq!(list(&pool).await.unwrap().len(), 3);
        assert_eq!(logs(&pool).await[0].log.action, "Deleted role");
    }

    #[tokio::test]
    async fn toggle_twice_restores_membership() {
        let pool = pool().await;
        let before = matrix(&pool).await.unwrap();
        assert!(!before.is_granted(3, 7));

        let first = toggle_permission(&pool, ACTOR, 3, 7).await.unwrap();
        assert!(first.granted);
        assert!(matrix(&pool).await.unwrap().is_granted(3, 7));

        let second = toggle_permission(&pool, ACTOR, 3, 7).await.unwrap();
        assert!(!second.granted);
        assert_eq!(matrix(&pool).await.unwrap().grants, before.grants);

        let logs = logs(&pool).await;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].log.action, "Removed permission: view_logs");
        assert_eq!(logs[1].log.action, "Added permission: view_logs");
        assert_eq!(logs[1].log.target_id, "3");
    }

    #[tokio::test]
    async fn toggle_unknown_targets() {
        let pool = pool().await;
        let err = toggle_permission(&pool, ACTOR, 99, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleNotFound);
        let err = toggle_permission(&pool, ACTOR, 3, 99).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionNotFound);
        assert!(logs(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn matrix_groups_permissions() {
        let pool = pool().await;
        let m = matrix(&pool).await.unwrap();
        assert_eq!(m.roles.len(), 3);
        let total: usize = m.groups.iter().map(|g| g.permissions.len()).sum();
        assert_eq!(total, 8);
        assert!(m.is_granted(1, 5));
        assert!(!m.is_granted(2, 2));
    }
}

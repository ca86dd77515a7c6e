//! Role Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{DEFAULT_ROLE_COLOR, Role, RoleCreate, RoleUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const COLUMNS: &str =
    "id, name, display_name, color, badge_text, priority, is_staff, is_system, created_at";

/// All roles, highest priority first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>(&format!(
        "SELECT {COLUMNS} FROM role ORDER BY priority DESC, name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as::<_, Role>(&format!("SELECT {COLUMNS} FROM role WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(role)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as::<_, Role>(&format!(
        "SELECT {COLUMNS} FROM role WHERE name = ? LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(role)
}

/// Roles assigned to a user, ordered so the primary role comes first
/// (priority descending, name ascending on ties)
pub async fn find_for_user(pool: &SqlitePool, user_id: &str) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>(
        "SELECT r.id, r.name, r.display_name, r.color, r.badge_text, r.priority, r.is_staff, r.is_system, r.created_at \
         FROM user_role ur JOIN role r ON r.id = ur.role_id \
         WHERE ur.user_id = ? ORDER BY r.priority DESC, r.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM role")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

/// Insert a role. `data.name` must already be normalized.
pub async fn create(conn: &mut SqliteConnection, data: &RoleCreate) -> RepoResult<Role> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO role (id, name, display_name, color, badge_text, priority, is_staff, is_system, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.display_name)
    .bind(data.color.as_deref().unwrap_or(DEFAULT_ROLE_COLOR))
    .bind(&data.badge_text)
    .bind(data.priority.unwrap_or(0))
    .bind(data.is_staff.unwrap_or(false))
    .bind(now_millis())
    .execute(&mut *conn)
    .await?;

    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create role".into()))
}

/// Patch a non-system role. An empty `badge_text` clears the badge.
pub async fn update(conn: &mut SqliteConnection, id: i64, data: &RoleUpdate) -> RepoResult<Role> {
    let existing = find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::RoleNotFound, format!("Role {id} not found")))?;

    if existing.is_system {
        return Err(RepoError::Business(
            ErrorCode::RoleIsSystem,
            "Cannot modify system role".into(),
        ));
    }

    sqlx::query(
        "UPDATE role SET name = COALESCE(?1, name), display_name = COALESCE(?2, display_name), \
         color = COALESCE(?3, color), \
         badge_text = CASE WHEN ?4 IS NULL THEN badge_text ELSE NULLIF(?4, '') END, \
         priority = COALESCE(?5, priority), is_staff = COALESCE(?6, is_staff) WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.display_name)
    .bind(&data.color)
    .bind(&data.badge_text)
    .bind(data.priority)
    .bind(data.is_staff)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::RoleNotFound, format!("Role {id} not found")))
}

/// Delete a non-system role, returning the removed row.
///
/// Grants, assignments and overlay rows go with it (ON DELETE CASCADE).
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<Role> {
    let existing = find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::RoleNotFound, format!("Role {id} not found")))?;

    if existing.is_system {
        return Err(RepoError::Business(
            ErrorCode::RoleIsSystem,
            "Cannot delete system role".into(),
        ));
    }

    sqlx::query("DELETE FROM role WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(existing)
}

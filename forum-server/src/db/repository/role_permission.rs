//! Role-Permission Matrix Repository

use super::RepoResult;
use shared::models::RolePermission;
use sqlx::{SqliteConnection, SqlitePool};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<RolePermission>> {
    let grants = sqlx::query_as::<_, RolePermission>(
        "SELECT role_id, permission_id FROM role_permission ORDER BY role_id, permission_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(grants)
}

pub async fn exists(
    conn: &mut SqliteConnection,
    role_id: i64,
    permission_id: i64,
) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM role_permission WHERE role_id = ? AND permission_id = ?",
    )
    .bind(role_id)
    .bind(permission_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(found.is_some())
}

pub async fn grant(conn: &mut SqliteConnection, role_id: i64, permission_id: i64) -> RepoResult<()> {
    sqlx::query("INSERT INTO role_permission (role_id, permission_id) VALUES (?, ?)")
        .bind(role_id)
        .bind(permission_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn revoke(
    conn: &mut SqliteConnection,
    role_id: i64,
    permission_id: i64,
) -> RepoResult<()> {
    sqlx::query("DELETE FROM role_permission WHERE role_id = ? AND permission_id = ?")
        .bind(role_id)
        .bind(permission_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

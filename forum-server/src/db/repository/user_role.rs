//! User-Role Assignment Repository

use super::RepoResult;
use shared::models::UserRole;
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<UserRole>> {
    let rows = sqlx::query_as::<_, UserRole>(
        "SELECT id, user_id, role_id, assigned_by, created_at FROM user_role ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn role_ids_for_user(pool: &SqlitePool, user_id: &str) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT role_id FROM user_role WHERE user_id = ? ORDER BY role_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

pub async fn delete_for_user(conn: &mut SqliteConnection, user_id: &str) -> RepoResult<u64> {
    let result = sqlx::query("DELETE FROM user_role WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// Insert one row per role id. Duplicates in `role_ids` are ignored.
pub async fn insert_many(
    conn: &mut SqliteConnection,
    user_id: &str,
    role_ids: &[i64],
    assigned_by: &str,
) -> RepoResult<()> {
    let now = now_millis();
    for role_id in role_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO user_role (id, user_id, role_id, assigned_by, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(user_id)
        .bind(role_id)
        .bind(assigned_by)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

//! Permission Repository (read-only; rows are seeded by migration)

use super::RepoResult;
use shared::models::Permission;
use sqlx::{Sqlite, SqlitePool};

/// All permissions ordered by category, then name
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Permission>> {
    let permissions = sqlx::query_as::<_, Permission>(
        "SELECT id, name, display_name, description, category FROM permission ORDER BY category, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(permissions)
}

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Permission>> {
    let permission = sqlx::query_as::<_, Permission>(
        "SELECT id, name, display_name, description, category FROM permission WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(permission)
}

/// Distinct permission names granted to any of the given roles
pub async fn names_for_roles(pool: &SqlitePool, role_ids: &[i64]) -> RepoResult<Vec<String>> {
    if role_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; role_ids.len()].join(", ");
    let sql = format!(
        "SELECT DISTINCT p.name FROM role_permission rp JOIN permission p ON p.id = rp.permission_id \
         WHERE rp.role_id IN ({placeholders}) ORDER BY p.name"
    );
    let mut query = sqlx::query_scalar::<_, String>(&sql);
    for id in role_ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}

//! Category Permission Overlay Repository

use super::{RepoError, RepoResult};
use shared::models::{CategoryPermission, PermissionField};
use shared::util::snowflake_id;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, category_id, role_id, can_view, can_create_thread, can_reply";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<CategoryPermission>> {
    let rows = sqlx::query_as::<_, CategoryPermission>(&format!(
        "SELECT {COLUMNS} FROM category_permission ORDER BY category_id, role_id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Overlay rows for a set of roles, across every category
pub async fn find_for_roles(
    pool: &SqlitePool,
    role_ids: &[i64],
) -> RepoResult<Vec<CategoryPermission>> {
    if role_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; role_ids.len()].join(", ");
    let sql = format!("SELECT {COLUMNS} FROM category_permission WHERE role_id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, CategoryPermission>(&sql);
    for id in role_ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}

pub async fn find_pair(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    category_id: i64,
    role_id: i64,
) -> RepoResult<Option<CategoryPermission>> {
    let row = sqlx::query_as::<_, CategoryPermission>(&format!(
        "SELECT {COLUMNS} FROM category_permission WHERE category_id = ? AND role_id = ?"
    ))
    .bind(category_id)
    .bind(role_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Set one flag for a (category, role) pair.
///
/// Patches the existing row, or inserts one with the other two flags `true`.
pub async fn set_field(
    conn: &mut SqliteConnection,
    category_id: i64,
    role_id: i64,
    field: PermissionField,
    value: bool,
) -> RepoResult<CategoryPermission> {
    match find_pair(&mut *conn, category_id, role_id).await? {
        Some(row) => {
            // column name comes from a closed enum
            let sql = format!(
                "UPDATE category_permission SET {} = ? WHERE id = ?",
                field.as_str()
            );
            sqlx::query(&sql)
                .bind(value)
                .bind(row.id)
                .execute(&mut *conn)
                .await?;
        }
        None => {
            let mut row = CategoryPermission {
                id: snowflake_id(),
                category_id,
                role_id,
                can_view: true,
                can_create_thread: true,
                can_reply: true,
            };
            match field {
                PermissionField::CanView => row.can_view = value,
                PermissionField::CanCreateThread => row.can_create_thread = value,
                PermissionField::CanReply => row.can_reply = value,
            }
            sqlx::query(
                "INSERT INTO category_permission (id, category_id, role_id, can_view, can_create_thread, can_reply) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(row.id)
            .bind(row.category_id)
            .bind(row.role_id)
            .bind(row.can_view)
            .bind(row.can_create_thread)
            .bind(row.can_reply)
            .execute(&mut *conn)
            .await?;
        }
    }

    find_pair(&mut *conn, category_id, role_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to write category permission".into()))
}

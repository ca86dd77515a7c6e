//! Notification Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::Notification;
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, user_id, title, message, type, post_id, is_read, created_at";

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Notification>> {
    let row = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {COLUMNS} FROM notification WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: &str,
    title: &str,
    message: &str,
    kind: &str,
    post_id: Option<i64>,
) -> RepoResult<Notification> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO notification (id, user_id, title, message, type, post_id, is_read, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, 0, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(message)
    .bind(kind)
    .bind(post_id)
    .bind(now_millis())
    .execute(&mut *conn)
    .await?;

    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create notification".into()))
}

/// Newest first
pub async fn find_recent_for_user(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> RepoResult<Vec<Notification>> {
    let rows = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {COLUMNS} FROM notification WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?"
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_unread(pool: &SqlitePool, user_id: &str) -> RepoResult<i64> {
    let n: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM notification WHERE user_id = ? AND is_read = 0")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(n)
}

/// Mark one notification read. Only the owner's rows match.
pub async fn mark_read(pool: &SqlitePool, user_id: &str, id: i64) -> RepoResult<()> {
    let result = sqlx::query("UPDATE notification SET is_read = 1 WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::Business(
            ErrorCode::NotificationNotFound,
            format!("Notification {id} not found"),
        ));
    }
    Ok(())
}

/// Mark every unread notification of the user read, returning how many changed
pub async fn mark_all_read(pool: &SqlitePool, user_id: &str) -> RepoResult<u64> {
    let result = sqlx::query("UPDATE notification SET is_read = 1 WHERE user_id = ? AND is_read = 0")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;

    #[tokio::test]
    async fn read_state_is_per_owner() {
        let pool = test_support::pool().await;
        let (a, _b) = {
            let mut conn = pool.acquire().await.unwrap();
            let a = insert(&mut conn, "u1", "Admin Reply", "m1", "admin_reply", None)
                .await
                .unwrap();
            let b = insert(&mut conn, "u1", "Admin Reply", "m2", "admin_reply", None)
                .await
                .unwrap();
            insert(&mut conn, "u2", "Admin Reply", "m3", "admin_reply", None)
                .await
                .unwrap();
            (a, b)
        };

        assert_eq!(count_unread(&pool, "u1").await.unwrap(), 2);
        assert!(mark_read(&pool, "u2", a.id).await.is_err());
        mark_read(&pool, "u1", a.id).await.unwrap();
        assert_eq!(count_unread(&pool, "u1").await.unwrap(), 1);

        assert_eq!(mark_all_read(&pool, "u1").await.unwrap(), 1);
        assert_eq!(count_unread(&pool, "u1").await.unwrap(), 0);
        assert_eq!(count_unread(&pool, "u2").await.unwrap(), 1);
        assert_eq!(find_recent_for_user(&pool, "u1", 10).await.unwrap().len(), 2);
    }
}

//! Forum Reply Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{ForumReply, ReplyView};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, post_id, user_id, content, is_admin_reply, created_at";

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<ForumReply>> {
    let reply = sqlx::query_as::<_, ForumReply>(&format!(
        "SELECT {COLUMNS} FROM forum_reply WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(reply)
}

/// Replies of a post, oldest first, with author display names
pub async fn find_by_post(pool: &SqlitePool, post_id: i64) -> RepoResult<Vec<ReplyView>> {
    let rows = sqlx::query_as::<_, ReplyView>(
        "SELECT r.id, r.post_id, r.user_id, r.content, r.is_admin_reply, r.created_at, \
                p.display_name AS author_name \
         FROM forum_reply r LEFT JOIN profile p ON p.user_id = r.user_id \
         WHERE r.post_id = ? ORDER BY r.created_at, r.id",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    conn: &mut SqliteConnection,
    post_id: i64,
    user_id: &str,
    content: &str,
    is_admin_reply: bool,
) -> RepoResult<ForumReply> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO forum_reply (id, post_id, user_id, content, is_admin_reply, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(post_id)
    .bind(user_id)
    .bind(content)
    .bind(is_admin_reply)
    .bind(now_millis())
    .execute(&mut *conn)
    .await?;

    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create reply".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM forum_reply WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::Business(
            ErrorCode::ReplyNotFound,
            format!("Reply {id} not found"),
        ));
    }
    Ok(())
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM forum_reply")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

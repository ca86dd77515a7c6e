//! Forum Post Repository

use super::{RepoError, RepoResult, like_pattern};
use shared::error::ErrorCode;
use shared::models::{ForumPost, ModerationFlag, PostCreate, PostSummary, PostUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, category_id, user_id, title, content, is_pinned, is_locked, is_solved, \
                       view_count, created_at, updated_at";

const SUMMARY_SELECT: &str = "SELECT p.id, p.category_id, p.user_id, p.title, p.content, p.is_pinned, \
        p.is_locked, p.is_solved, p.view_count, p.created_at, p.updated_at, \
        pr.display_name AS author_name, \
        (SELECT COUNT(*) FROM forum_reply r WHERE r.post_id = p.id) AS reply_count \
     FROM forum_post p LEFT JOIN profile pr ON pr.user_id = p.user_id";

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<ForumPost>> {
    let post = sqlx::query_as::<_, ForumPost>(&format!(
        "SELECT {COLUMNS} FROM forum_post WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(post)
}

pub(crate) fn not_found(id: i64) -> RepoError {
    RepoError::Business(ErrorCode::PostNotFound, format!("Post {id} not found"))
}

/// Posts of one category: pinned first, then newest
pub async fn find_by_category(pool: &SqlitePool, category_id: i64) -> RepoResult<Vec<PostSummary>> {
    let rows = sqlx::query_as::<_, PostSummary>(&format!(
        "{SUMMARY_SELECT} WHERE p.category_id = ? ORDER BY p.is_pinned DESC, p.created_at DESC, p.id DESC"
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Most recent posts across all categories, optionally filtered by title
pub async fn find_recent(
    pool: &SqlitePool,
    search: Option<&str>,
    limit: i64,
) -> RepoResult<Vec<PostSummary>> {
    let rows = match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => {
            sqlx::query_as::<_, PostSummary>(&format!(
                "{SUMMARY_SELECT} WHERE p.title LIKE ? ESCAPE '\\' ORDER BY p.created_at DESC, p.id DESC LIMIT ?"
            ))
            .bind(like_pattern(s))
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, PostSummary>(&format!(
                "{SUMMARY_SELECT} ORDER BY p.created_at DESC, p.id DESC LIMIT ?"
            ))
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, user_id: &str, data: &PostCreate) -> RepoResult<ForumPost> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO forum_post (id, category_id, user_id, title, content, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(data.category_id)
    .bind(user_id)
    .bind(&data.title)
    .bind(&data.content)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create post".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &PostUpdate) -> RepoResult<ForumPost> {
    let result = sqlx::query(
        "UPDATE forum_post SET title = COALESCE(?1, title), content = COALESCE(?2, content), \
         updated_at = ?3 WHERE id = ?4",
    )
    .bind(&data.title)
    .bind(&data.content)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    find_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM forum_post WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

pub async fn increment_views(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE forum_post SET view_count = view_count + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Write one moderation flag. Does not touch `updated_at`.
pub async fn set_flag(
    conn: &mut SqliteConnection,
    id: i64,
    flag: ModerationFlag,
    value: bool,
) -> RepoResult<ForumPost> {
    // column name comes from a closed enum
    let sql = format!("UPDATE forum_post SET {} = ? WHERE id = ?", flag.column());
    let result = sqlx::query(&sql)
        .bind(value)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    find_by_id(&mut *conn, id).await?.ok_or_else(|| not_found(id))
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM forum_post")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

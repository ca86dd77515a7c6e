//! Moderation Log Repository
//!
//! Append and query only. The table rejects UPDATE and DELETE via triggers.

use super::{RepoResult, like_pattern};
use serde_json::Value;
use shared::models::ModerationLogEntry;
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqlitePool};

const ENTRY_SELECT: &str = "SELECT l.id, l.actor_id, l.action, l.target_type, l.target_id, l.details, \
        l.created_at, p.display_name AS actor_name \
     FROM moderation_log l LEFT JOIN profile p ON p.user_id = l.actor_id";

pub async fn insert(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    actor_id: &str,
    action: &str,
    target_type: &str,
    target_id: &str,
    details: &Value,
) -> RepoResult<i64> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO moderation_log (id, actor_id, action, target_type, target_id, details, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(actor_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(sqlx::types::Json(details))
    .bind(now_millis())
    .execute(conn)
    .await?;
    Ok(id)
}

/// Most recent first. `search` matches the action text or the actor's display name.
pub async fn find_recent(
    pool: &SqlitePool,
    search: Option<&str>,
    limit: i64,
) -> RepoResult<Vec<ModerationLogEntry>> {
    let rows = match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => {
            let pattern = like_pattern(s);
            sqlx::query_as::<_, ModerationLogEntry>(&format!(
                "{ENTRY_SELECT} WHERE l.action LIKE ?1 ESCAPE '\\' OR p.display_name LIKE ?1 ESCAPE '\\' \
                 ORDER BY l.created_at DESC, l.id DESC LIMIT ?2"
            ))
            .bind(pattern)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ModerationLogEntry>(&format!(
                "{ENTRY_SELECT} ORDER BY l.created_at DESC, l.id DESC LIMIT ?"
            ))
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows)
}

/// Entries for one target, oldest first
pub async fn find_for_target(
    pool: &SqlitePool,
    target_type: &str,
    target_id: &str,
) -> RepoResult<Vec<ModerationLogEntry>> {
    let rows = sqlx::query_as::<_, ModerationLogEntry>(&format!(
        "{ENTRY_SELECT} WHERE l.target_type = ? AND l.target_id = ? ORDER BY l.created_at, l.id"
    ))
    .bind(target_type)
    .bind(target_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;
    use serde_json::json;

    #[tokio::test]
    async fn append_and_search() {
        let pool = test_support::pool().await;
        insert(&pool, "a1", "Created role", "role", "10", &json!({"role_name": "helper"}))
            .await
            .unwrap();
        insert(&pool, "a1", "Set pinned", "post", "20", &Value::Null)
            .await
            .unwrap();

        let all = find_recent(&pool, None, 200).await.unwrap();
        assert_eq!(all.len(), 2);

        let hits = find_recent(&pool, Some("role"), 200).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].log.details["role_name"], "helper");

        let for_post = find_for_target(&pool, "post", "20").await.unwrap();
        assert_eq!(for_post.len(), 1);
        assert_eq!(for_post[0].log.details, Value::Null);
    }

    #[tokio::test]
    async fn rows_cannot_be_rewritten() {
        let pool = test_support::pool().await;
        insert(&pool, "a1", "Created role", "role", "10", &Value::Null)
            .await
            .unwrap();

        assert!(sqlx::query("UPDATE moderation_log SET action = 'x'")
            .execute(&pool)
            .await
            .is_err());
        assert!(sqlx::query("DELETE FROM moderation_log")
            .execute(&pool)
            .await
            .is_err());
    }
}

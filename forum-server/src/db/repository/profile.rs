//! Profile Repository

use super::{RepoError, RepoResult, like_pattern};
use shared::models::{Profile, ProfileUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "user_id, display_name, avatar_url, created_at, updated_at";

pub async fn find_by_user(pool: &SqlitePool, user_id: &str) -> RepoResult<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(&format!(
        "SELECT {COLUMNS} FROM profile WHERE user_id = ?"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(profile)
}

/// Profiles ordered by display name, optionally filtered by a name fragment
pub async fn search(pool: &SqlitePool, search: Option<&str>) -> RepoResult<Vec<Profile>> {
    let profiles = match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => {
            sqlx::query_as::<_, Profile>(&format!(
                "SELECT {COLUMNS} FROM profile WHERE display_name LIKE ? ESCAPE '\\' \
                 ORDER BY display_name COLLATE NOCASE"
            ))
            .bind(like_pattern(s))
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Profile>(&format!(
                "SELECT {COLUMNS} FROM profile ORDER BY display_name COLLATE NOCASE"
            ))
            .fetch_all(pool)
            .await?
        }
    };
    Ok(profiles)
}

/// Insert or patch the caller's profile
pub async fn upsert(pool: &SqlitePool, user_id: &str, data: &ProfileUpdate) -> RepoResult<Profile> {
    let now = now_millis();
    sqlx::query(
        "INSERT INTO profile (user_id, display_name, avatar_url, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) \
         ON CONFLICT(user_id) DO UPDATE SET \
           display_name = COALESCE(excluded.display_name, profile.display_name), \
           avatar_url = COALESCE(excluded.avatar_url, profile.avatar_url), \
           updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(&data.display_name)
    .bind(&data.avatar_url)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_user(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to upsert profile".into()))
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profile")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

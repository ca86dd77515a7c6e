//! 帖子审核、审核日志与后台统计

use shared::models::{
    AdminStats, ForumPost, ModerationFlag, ModerationLogEntry, ModerationLogQuery, PostSummary,
};
use sqlx::SqlitePool;

use super::{begin, commit};
use crate::audit::{self, ModerationEntry};
use crate::db::repository::{forum_post, forum_reply, moderation_log, profile, role};
use crate::utils::AppResult;

/// 审核列表的帖子数
pub const MODERATION_POST_LIMIT: i64 = 100;
/// 日志默认条数
pub const DEFAULT_LOG_LIMIT: i64 = 200;
/// 日志单次上限
pub const MAX_LOG_LIMIT: i64 = 1000;
/// 后台首页展示的最近日志条数
pub const STATS_RECENT_LOGS: i64 = 5;

/// Most recent posts, optionally filtered by title
pub async fn list_posts(pool: &SqlitePool, search: Option<&str>) -> AppResult<Vec<PostSummary>> {
    Ok(forum_post::find_recent(pool, search, MODERATION_POST_LIMIT).await?)
}

/// Flip one moderation flag of a post
pub async fn toggle_flag(
    pool: &SqlitePool,
    actor_id: &str,
    post_id: i64,
    flag: ModerationFlag,
) -> AppResult<ForumPost> {
    let mut tx = begin(pool).await?;

    let post = forum_post::find_by_id(&mut *tx, post_id)
        .await?
        .ok_or_else(|| forum_post::not_found(post_id))?;
    let value = !post.flag(flag);

    let updated = forum_post::set_flag(&mut tx, post_id, flag, value).await?;
    audit::record(&mut tx, actor_id, &ModerationEntry::post_flag(post_id, flag, value)).await?;
    commit(tx).await?;

    tracing::info!(actor_id = %actor_id, post_id, flag = %flag, value, "Post flag toggled");
    Ok(updated)
}

pub async fn logs(pool: &SqlitePool, query: &ModerationLogQuery) -> AppResult<Vec<ModerationLogEntry>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LOG_LIMIT)
        .clamp(1, MAX_LOG_LIMIT);
    Ok(moderation_log::find_recent(pool, query.search.as_deref(), limit).await?)
}

pub async fn stats(pool: &SqlitePool) -> AppResult<AdminStats> {
    Ok(AdminStats {
        profiles: profile::count(pool).await?,
        posts: forum_post::count(pool).await?,
        replies: forum_reply::count(pool).await?,
        roles: role::count(pool).await?,
        recent_logs: moderation_log::find_recent(pool, None, STATS_RECENT_LOGS).await?,
    })
}

//! 通知读取与已读

use shared::models::{Notification, NotificationList};
use sqlx::SqlitePool;

use crate::db::repository::notification;
use crate::realtime::{FEED_LIMIT, HubEvent, NotificationHub};
use crate::utils::AppResult;

/// The user's most recent notifications and unread total
pub async fn list(pool: &SqlitePool, user_id: &str) -> AppResult<NotificationList> {
    let items = notification::find_recent_for_user(pool, user_id, FEED_LIMIT as i64).await?;
    let unread_count = notification::count_unread(pool, user_id).await?;
    Ok(NotificationList {
        items,
        unread_count,
    })
}

/// Mark one of the user's notifications read, returning the new unread total
pub async fn mark_read(
    pool: &SqlitePool,
    hub: &NotificationHub,
    user_id: &str,
    id: i64,
) -> AppResult<i64> {
    notification::mark_read(pool, user_id, id).await?;
    let unread_count = notification::count_unread(pool, user_id).await?;
    hub.publish(user_id, HubEvent::Read { id, unread_count });
    Ok(unread_count)
}

/// Returns how many rows changed
pub async fn mark_all_read(pool: &SqlitePool, hub: &NotificationHub, user_id: &str) -> AppResult<u64> {
    let changed = notification::mark_all_read(pool, user_id).await?;
    hub.publish(user_id, HubEvent::AllRead);
    tracing::debug!(user_id = %user_id, changed, "Notifications marked read");
    Ok(changed)
}

/// Push committed notifications to their owners' open sockets
pub fn publish_created(hub: &NotificationHub, created: Vec<Notification>) {
    for n in created {
        let user_id = n.user_id.clone();
        let delivered = hub.publish(&user_id, HubEvent::Created(n));
        tracing::debug!(user_id = %user_id, delivered, "Notification published");
    }
}

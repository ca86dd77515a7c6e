//! Notification Model

use serde::{Deserialize, Serialize};

/// Type tag for staff replies
pub const NOTIFICATION_ADMIN_REPLY: &str = "admin_reply";

/// Per-user notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "db", sqlx(rename = "type"))]
    pub kind: String,
    pub post_id: Option<i64>,
    pub is_read: bool,
    pub created_at: i64,
}

/// Bell dropdown payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationList {
    /// Newest first, at most 10
    pub items: Vec<Notification>,
    pub unread_count: i64,
}

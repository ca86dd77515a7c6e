//! 实时推送消息类型
//!
//! Frames sent over the notification WebSocket. Every frame is scoped to the
//! authenticated user of the connection and carries the whole bell list, so
//! a client can simply replace its local state.

use serde::{Deserialize, Serialize};

use crate::models::{Notification, NotificationList};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeEvent {
    /// Full state, sent right after the socket opens and after a resync
    Snapshot {
        notifications: Vec<Notification>,
        unread_count: i64,
    },
    /// The list changed: a notification arrived or was marked read
    FeedUpdated {
        notifications: Vec<Notification>,
        unread_count: i64,
    },
}

impl RealtimeEvent {
    pub fn snapshot(list: NotificationList) -> Self {
        RealtimeEvent::Snapshot {
            notifications: list.items,
            unread_count: list.unread_count,
        }
    }

    pub fn feed_updated(list: NotificationList) -> Self {
        RealtimeEvent::FeedUpdated {
            notifications: list.items,
            unread_count: list.unread_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_is_tagged() {
        let event = RealtimeEvent::snapshot(NotificationList {
            items: vec![],
            unread_count: 3,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "snapshot");
        assert_eq!(json["unread_count"], 3);

        let json = serde_json::to_value(RealtimeEvent::feed_updated(NotificationList::default()))
            .unwrap();
        assert_eq!(json["type"], "feed_updated");
        assert!(json["notifications"].as_array().unwrap().is_empty());
    }
}

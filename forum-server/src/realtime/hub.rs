//! NotificationHub - 按用户分发的通知广播
//!
//! ```text
//! reply handler / notification handler
//!       │ HubEvent
//!       ▼
//! NotificationHub
//!   └── users: user_id → broadcast::Sender<HubEvent>
//!             │
//!             ▼
//!       WS session (one receiver per open socket)
//! ```
//!
//! Channels are created on first subscribe and removed once the last
//! receiver is gone.

use dashmap::DashMap;
use shared::models::Notification;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default per-user broadcast capacity
pub const DEFAULT_CAPACITY: usize = 64;

/// Store change visible to one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent {
    /// A notification row was inserted for the user
    Created(Notification),
    /// One notification was marked read; carries the new unread total
    Read { id: i64, unread_count: i64 },
    /// Every notification of the user was marked read
    AllRead,
}

#[derive(Clone)]
pub struct NotificationHub {
    users: Arc<DashMap<String, broadcast::Sender<HubEvent>>>,
    capacity: usize,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            // broadcast::channel panics on zero
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to the user's events
    pub fn subscribe(&self, user_id: &str) -> broadcast::Receiver<HubEvent> {
        self.users
            .entry(user_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Deliver an event to every open socket of the user.
    ///
    /// Returns how many receivers got it; zero when the user is offline.
    pub fn publish(&self, user_id: &str, event: HubEvent) -> usize {
        let sent = match self.users.get(user_id) {
            Some(tx) => tx.send(event).ok(),
            None => return 0,
        };

        match sent {
            Some(n) => n,
            None => {
                // 无订阅者，清理条目
                self.release(user_id);
                0
            }
        }
    }

    /// Drop the user's channel if nobody listens any more
    pub fn release(&self, user_id: &str) {
        self.users
            .remove_if(user_id, |_, tx| tx.receiver_count() == 0);
    }

    pub fn subscriber_count(&self, user_id: &str) -> usize {
        self.users
            .get(user_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Number of users with a live channel
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(id: i64, user_id: &str) -> Notification {
        Notification {
            id,
            user_id: user_id.into(),
            title: "Admin Reply".into(),
            message: "m".into(),
            kind: "admin_reply".into(),
            post_id: Some(1),
            is_read: false,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn events_reach_only_their_user() {
        let hub = NotificationHub::default();
        let mut a = hub.subscribe("a");
        let mut b = hub.subscribe("b");

        assert_eq!(hub.publish("a", HubEvent::Created(notification(1, "a"))), 1);
        assert_eq!(a.recv().await.unwrap(), HubEvent::Created(notification(1, "a")));
        assert!(b.try_recv().is_err());
    }

    #[tokio::test]
    async fn every_socket_of_a_user_receives() {
        let hub = NotificationHub::default();
        let mut first = hub.subscribe("a");
        let mut second = hub.subscribe("a");
        assert_eq!(hub.subscriber_count("a"), 2);

        assert_eq!(hub.publish("a", HubEvent::AllRead), 2);
        assert_eq!(first.recv().await.unwrap(), HubEvent::AllRead);
        assert_eq!(second.recv().await.unwrap(), HubEvent::AllRead);
    }

    #[test]
    fn offline_user_is_a_no_op() {
        let hub = NotificationHub::default();
        assert_eq!(hub.publish("ghost", HubEvent::AllRead), 0);
        assert_eq!(hub.user_count(), 0);
    }

    #[test]
    fn channel_dropped_after_last_receiver() {
        let hub = NotificationHub::default();
        let rx = hub.subscribe("a");
        assert_eq!(hub.user_count(), 1);

        hub.release("a");
        assert_eq!(hub.user_count(), 1, "still subscribed");

        drop(rx);
        hub.release("a");
        assert_eq!(hub.user_count(), 0);
    }

    #[test]
    fn publish_to_abandoned_channel_cleans_up() {
        let hub = NotificationHub::default();
        drop(hub.subscribe("a"));
        assert_eq!(hub.publish("a", HubEvent::AllRead), 0);
        assert_eq!(hub.user_count(), 0);
    }
}

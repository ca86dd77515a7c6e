//! Notification feed
//!
//! Per-socket view of the bell list. Updates go in through an `mpsc` queue
//! and are applied by a single task, which publishes the resulting list on a
//! `watch` channel. Inserts are deduplicated by notification id, so a row
//! that shows up both in the initial load and on the hub counts once.

use shared::models::{Notification, NotificationList};
use tokio::sync::{mpsc, watch};

use super::hub::HubEvent;

/// Visible items in the bell list
pub const FEED_LIMIT: usize = 10;

const QUEUE_CAPACITY: usize = 32;

/// Input of the feed task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedUpdate {
    Created(Notification),
    Read { id: i64, unread_count: i64 },
    AllRead,
    /// Replace everything, e.g. after the hub receiver lagged
    Reset(NotificationList),
}

impl From<HubEvent> for FeedUpdate {
    fn from(event: HubEvent) -> Self {
        match event {
            HubEvent::Created(n) => FeedUpdate::Created(n),
            HubEvent::Read { id, unread_count } => FeedUpdate::Read { id, unread_count },
            HubEvent::AllRead => FeedUpdate::AllRead,
        }
    }
}

/// Pure state of the feed, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
    items: Vec<Notification>,
    unread_count: i64,
}

impl FeedState {
    pub fn new(list: NotificationList) -> Self {
        let mut items = list.items;
        items.truncate(FEED_LIMIT);
        Self {
            items,
            unread_count: list.unread_count.max(0),
        }
    }

    /// Apply one update. Returns false when nothing changed.
    pub fn apply(&mut self, update: FeedUpdate) -> bool {
        match update {
            FeedUpdate::Created(n) => {
                if self.items.iter().any(|i| i.id == n.id) {
                    return false;
                }
                if !n.is_read {
                    self.unread_count += 1;
                }
                self.items.insert(0, n);
                self.items.truncate(FEED_LIMIT);
                true
            }
            FeedUpdate::Read { id, unread_count } => {
                let mut changed = self.unread_count != unread_count;
                if let Some(item) = self.items.iter_mut().find(|i| i.id == id)
                    && !item.is_read
                {
                    item.is_read = true;
                    changed = true;
                }
                self.unread_count = unread_count.max(0);
                changed
            }
            FeedUpdate::AllRead => {
                let mut changed = self.unread_count != 0;
                for item in self.items.iter_mut().filter(|i| !i.is_read) {
                    item.is_read = true;
                    changed = true;
                }
                self.unread_count = 0;
                changed
            }
            FeedUpdate::Reset(list) => {
                let next = FeedState::new(list);
                let changed = next != *self;
                *self = next;
                changed
            }
        }
    }

    pub fn to_list(&self) -> NotificationList {
        NotificationList {
            items: self.items.clone(),
            unread_count: self.unread_count,
        }
    }
}

/// Handle to a running feed task.
///
/// The task stops once every handle is dropped.
#[derive(Clone)]
pub struct NotificationFeed {
    tx: mpsc::Sender<FeedUpdate>,
    rx: watch::Receiver<NotificationList>,
}

impl NotificationFeed {
    pub fn spawn(initial: NotificationList) -> Self {
        let mut state = FeedState::new(initial);
        let (tx, mut queue) = mpsc::channel::<FeedUpdate>(QUEUE_CAPACITY);
        let (out, rx) = watch::channel(state.to_list());

        tokio::spawn(async move {
            while let Some(update) = queue.recv().await {
                if state.apply(update) && out.send(state.to_list()).is_err() {
                    break;
                }
            }
        });

        Self { tx, rx }
    }

    /// Queue an update; false if the task is gone
    pub async fn push(&self, update: impl Into<FeedUpdate>) -> bool {
        self.tx.send(update.into()).await.is_ok()
    }

    pub fn watch(&self) -> watch::Receiver<NotificationList> {
        self.rx.clone()
    }

    pub fn current(&self) -> NotificationList {
        self.rx.borrow().clone()
    }
}

//! 实时通知推送
//!
//! - [`NotificationHub`] - per-user broadcast of store changes
//! - [`NotificationFeed`] - per-socket deduplicated bell list

pub mod feed;
pub mod hub;

pub use feed::{FEED_LIMIT, FeedState, FeedUpdate, NotificationFeed};
pub use hub::{HubEvent, NotificationHub};

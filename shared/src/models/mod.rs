//! Data models
//!
//! Shared between forum-server and its frontends (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Row IDs are `i64` snowflakes; user IDs are the identity provider's `sub`.

pub mod category;
pub mod category_permission;
pub mod moderation_log;
pub mod notification;
pub mod permission;
pub mod post;
pub mod profile;
pub mod role;
pub mod user_role;

// Re-exports
pub use category::*;
pub use category_permission::*;
pub use moderation_log::*;
pub use notification::*;
pub use permission::*;
pub use post::*;
pub use profile::*;
pub use role::*;
pub use user_role::*;

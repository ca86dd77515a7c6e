//! Moderation Log Models (append-only)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// What kind of entity a log row refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Role,
    Category,
    User,
    Post,
}

impl TargetType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TargetType::Role => "role",
            TargetType::Category => "category",
            TargetType::User => "user",
            TargetType::Post => "post",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored log row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ModerationLog {
    pub id: i64,
    pub actor_id: String,
    /// Free text, e.g. "Added permission: manage_roles"
    pub action: String,
    pub target_type: String,
    pub target_id: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub details: Value,
    pub created_at: i64,
}

/// Log row with the actor's display name joined in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ModerationLogEntry {
    #[cfg_attr(feature = "db", sqlx(flatten))]
    #[serde(flatten)]
    pub log: ModerationLog,
    pub actor_name: Option<String>,
}

/// Listing query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerationLogQuery {
    pub limit: Option<i64>,
    /// Matches action text or actor display name
    pub search: Option<String>,
}

/// Admin dashboard counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminStats {
    pub profiles: i64,
    pub posts: i64,
    pub replies: i64,
    pub roles: i64,
    pub recent_logs: Vec<ModerationLogEntry>,
}

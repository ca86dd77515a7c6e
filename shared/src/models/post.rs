//! Forum Post & Reply Models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Forum thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ForumPost {
    pub id: i64,
    pub category_id: i64,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub is_solved: bool,
    pub view_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ForumPost {
    pub fn flag(&self, flag: ModerationFlag) -> bool {
        match flag {
            ModerationFlag::Pinned => self.is_pinned,
            ModerationFlag::Locked => self.is_locked,
            ModerationFlag::Solved => self.is_solved,
        }
    }
}

/// Post list row (category view and moderation list)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PostSummary {
    #[cfg_attr(feature = "db", sqlx(flatten))]
    #[serde(flatten)]
    pub post: ForumPost,
    pub author_name: Option<String>,
    pub reply_count: i64,
}

/// Create post payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreate {
    pub category_id: i64,
    pub title: String,
    pub content: String,
}

/// Update post payload (author or staff)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Reply entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ForumReply {
    pub id: i64,
    pub post_id: i64,
    pub user_id: String,
    pub content: String,
    /// Set from the replier's staff status at insert time
    pub is_admin_reply: bool,
    pub created_at: i64,
}

/// Reply with its author's display name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReplyView {
    #[cfg_attr(feature = "db", sqlx(flatten))]
    #[serde(flatten)]
    pub reply: ForumReply,
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyCreate {
    pub content: String,
}

/// Post detail page payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: ForumPost,
    pub author_name: Option<String>,
    /// Oldest first
    pub replies: Vec<ReplyView>,
}

/// Moderation flag on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationFlag {
    Pinned,
    Locked,
    Solved,
}

impl ModerationFlag {
    /// Column name in `forum_post`
    pub const fn column(&self) -> &'static str {
        match self {
            ModerationFlag::Pinned => "is_pinned",
            ModerationFlag::Locked => "is_locked",
            ModerationFlag::Solved => "is_solved",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            ModerationFlag::Pinned => "pinned",
            ModerationFlag::Locked => "locked",
            ModerationFlag::Solved => "solved",
        }
    }

    /// Log action text: "Set pinned" / "Unset pinned"
    pub fn action(&self, new_value: bool) -> String {
        let verb = if new_value { "Set" } else { "Unset" };
        format!("{} {}", verb, self.label())
    }
}

impl fmt::Display for ModerationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModerationToggle {
    pub flag: ModerationFlag,
}

//! Forum Category Model

use serde::{Deserialize, Serialize};

use super::category_permission::CategoryAccess;
use super::post::PostSummary;

/// Forum category entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ForumCategory {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i64,
    pub created_at: i64,
}

/// Category list row with post count and the caller's effective access
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryListing {
    #[cfg_attr(feature = "db", sqlx(flatten))]
    #[serde(flatten)]
    pub category: ForumCategory,
    pub post_count: i64,
    /// Populated by application code after the overlay is evaluated
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub access: CategoryAccess,
}

/// One category page: the category, the caller's access and its threads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPosts {
    pub category: ForumCategory,
    pub access: CategoryAccess,
    pub posts: Vec<PostSummary>,
}

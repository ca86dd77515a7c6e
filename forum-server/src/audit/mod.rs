//! 审核日志写入
//!
//! Every privileged mutation appends exactly one [`ModerationEntry`] through
//! [`record`], inside the same transaction as the mutation itself.
//!
//! The action text is free-form on purpose: it is what moderators read in the
//! log screen, e.g. `"Added permission: manage_roles"` or `"Set pinned"`.

use serde_json::{Value, json};
use shared::models::{ModerationFlag, PermissionField, Role, TargetType};
use sqlx::SqliteConnection;

use crate::db::repository::{RepoResult, moderation_log};

/// One log row, before the actor and timestamp are attached
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationEntry {
    pub action: String,
    pub target_type: TargetType,
    pub target_id: String,
    pub details: Value,
}

impl ModerationEntry {
    pub fn role_created(role: &Role) -> Self {
        Self::role_event("Created role", role)
    }

    pub fn role_updated(role: &Role) -> Self {
        Self::role_event("Updated role", role)
    }

    pub fn role_deleted(role: &Role) -> Self {
        Self::role_event("Deleted role", role)
    }

    fn role_event(action: &str, role: &Role) -> Self {
        Self {
            action: action.to_string(),
            target_type: TargetType::Role,
            target_id: role.id.to_string(),
            details: json!({ "role_name": role.display_name }),
        }
    }

    /// `granted` is the membership after the toggle
    pub fn permission_toggled(role_id: i64, permission_name: &str, granted: bool) -> Self {
        let verb = if granted { "Added" } else { "Removed" };
        Self {
            action: format!("{verb} permission: {permission_name}"),
            target_type: TargetType::Role,
            target_id: role_id.to_string(),
            details: Value::Null,
        }
    }

    pub fn category_permission_updated(
        category_id: i64,
        role_id: i64,
        field: PermissionField,
        value: bool,
    ) -> Self {
        Self {
            action: format!("Updated category permission: {field}"),
            target_type: TargetType::Category,
            target_id: category_id.to_string(),
            details: json!({ "role_id": role_id, "field": field.as_str(), "value": value }),
        }
    }

    pub fn user_roles_updated(user_id: &str, role_ids: &[i64]) -> Self {
        Self {
            action: "Updated user roles".to_string(),
            target_type: TargetType::User,
            target_id: user_id.to_string(),
            details: json!({ "roles": role_ids }),
        }
    }

    /// `value` is the flag after the flip
    pub fn post_flag(post_id: i64, flag: ModerationFlag, value: bool) -> Self {
        Self {
            action: flag.action(value),
            target_type: TargetType::Post,
            target_id: post_id.to_string(),
            details: Value::Null,
        }
    }
}

/// Append the entry and mirror it to the `audit` tracing target
pub async fn record(
    conn: &mut SqliteConnection,
    actor_id: &str,
    entry: &ModerationEntry,
) -> RepoResult<i64> {
    let id = moderation_log::insert(
        &mut *conn,
        actor_id,
        &entry.action,
        entry.target_type.as_str(),
        &entry.target_id,
        &entry.details,
    )
    .await?;

    tracing::info!(
        target: "audit",
        log_id = id,
        actor_id = %actor_id,
        action = %entry.action,
        target_type = %entry.target_type,
        target_id = %entry.target_id,
        "AUDIT"
    );
    Ok(id)
}

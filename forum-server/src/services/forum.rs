//! 论坛分类、帖子与回复
//!
//! Category access comes from the overlay (see [`super::category_access`]);
//! editing and deleting content is limited to its author or staff.

use shared::models::{
    CategoryListing, CategoryPosts, ForumCategory, ForumPost, ForumReply,
    NOTIFICATION_ADMIN_REPLY, Notification, PermissionField, PostCreate, PostDetail, PostUpdate,
};
use sqlx::SqlitePool;

use super::category_access::{CallerOverlay, access_for, ensure};
use super::notifications::publish_created;
use super::{begin, commit};
use crate::auth::CurrentUser;
use crate::auth::permissions::DELETE_POST;
use crate::db::repository::{forum_category, forum_post, forum_reply, notification, profile};
use crate::permissions::ResolvedPermissions;
use crate::realtime::NotificationHub;
use crate::utils::validation::{MAX_CONTENT_LEN, MAX_TITLE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

pub const ADMIN_REPLY_TITLE: &str = "Admin Reply";

/// Categories the caller may view, each with its effective access
pub async fn categories(
    pool: &SqlitePool,
    caller: &ResolvedPermissions,
) -> AppResult<Vec<CategoryListing>> {
    let listings = forum_category::find_all_with_counts(pool).await?;
    let overlay = CallerOverlay::load(pool, caller).await?;

    Ok(listings
        .into_iter()
        .filter_map(|mut listing| {
            listing.access = overlay.access(listing.category.id);
            listing.access.can_view.then_some(listing)
        })
        .collect())
}

/// Threads of one category: pinned first, then newest
pub async fn category_posts(
    pool: &SqlitePool,
    caller: &ResolvedPermissions,
    slug: &str,
) -> AppResult<CategoryPosts> {
    let category = forum_category::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CategoryNotFound,
                format!("Category '{slug}' not found"),
            )
        })?;
    let access = access_for(pool, caller, category.id).await?;
    ensure(&access, PermissionField::CanView)?;

    let posts = forum_post::find_by_category(pool, category.id).await?;
    Ok(CategoryPosts {
        category,
        access,
        posts,
    })
}

pub async fn create_post(pool: &SqlitePool, user: &CurrentUser, data: PostCreate) -> AppResult<ForumPost> {
    let data = PostCreate {
        title: data.title.trim().to_string(),
        ..data
    };
    validate_required_text(&data.title, "title", MAX_TITLE_LEN)?;
    validate_required_text(&data.content, "content", MAX_CONTENT_LEN)?;

    let category = find_category(pool, data.category_id).await?;
    let access = access_for(pool, &user.permissions, category.id).await?;
    ensure(&access, PermissionField::CanView)?;
    ensure(&access, PermissionField::CanCreateThread)?;

    let post = forum_post::create(pool, &user.id, &data).await?;
    tracing::info!(user_id = %user.id, post_id = post.id, category = %category.slug, "Post created");
    Ok(post)
}

/// Post with its replies; counts as one view
pub async fn post_detail(
    pool: &SqlitePool,
    caller: &ResolvedPermissions,
    post_id: i64,
) -> AppResult<PostDetail> {
    let post = find_post(pool, post_id).await?;
    let access = access_for(pool, caller, post.category_id).await?;
    ensure(&access, PermissionField::CanView)?;

    forum_post::increment_views(pool, post_id).await?;
    let post = find_post(pool, post_id).await?;
    let author_name = profile::find_by_user(pool, &post.user_id)
        .await?
        .and_then(|p| p.display_name);
    let replies = forum_reply::find_by_post(pool, post_id).await?;

    Ok(PostDetail {
        post,
        author_name,
        replies,
    })
}

pub async fn update_post(
    pool: &SqlitePool,
    user: &CurrentUser,
    post_id: i64,
    data: PostUpdate,
) -> AppResult<ForumPost> {
    let post = find_post(pool, post_id).await?;
    if !user.can_manage(&post.user_id) {
        return Err(AppError::forbidden(ErrorCode::NotOwner));
    }

    let data = PostUpdate {
        title: data.title.map(|t| t.trim().to_string()),
        content: data.content,
    };
    if let Some(title) = &data.title {
        validate_required_text(title, "title", MAX_TITLE_LEN)?;
    }
    if let Some(content) = &data.content {
        validate_required_text(content, "content", MAX_CONTENT_LEN)?;
    }

    let updated = forum_post::update(pool, post_id, &data).await?;
    tracing::info!(user_id = %user.id, post_id, "Post updated");
    Ok(updated)
}

pub async fn delete_post(pool: &SqlitePool, user: &CurrentUser, post_id: i64) -> AppResult<()> {
    let post = find_post(pool, post_id).await?;
    if !can_delete(user, &post.user_id) {
        return Err(AppError::forbidden(ErrorCode::NotOwner));
    }
    forum_post::delete(pool, post_id).await?;
    tracing::info!(user_id = %user.id, post_id, author = %post.user_id, "Post deleted");
    Ok(())
}

/// Reply to a thread.
///
/// A staff reply to somebody else's thread notifies the author; the
/// notification is written with the reply and pushed after commit.
pub async fn reply(
    pool: &SqlitePool,
    hub: &NotificationHub,
    user: &CurrentUser,
    post_id: i64,
    content: &str,
) -> AppResult<ForumReply> {
    validate_required_text(content, "content", MAX_CONTENT_LEN)?;

    let post = find_post(pool, post_id).await?;
    let access = access_for(pool, &user.permissions, post.category_id).await?;
    ensure(&access, PermissionField::CanView)?;
    ensure(&access, PermissionField::CanReply)?;

    let is_staff = user.is_staff();

    let mut tx = begin(pool).await?;
    // lock state is read again inside the transaction
    let post = forum_post::find_by_id(&mut *tx, post_id)
        .await?
        .ok_or_else(|| forum_post::not_found(post_id))?;
    if post.is_locked && !is_staff {
        return Err(AppError::forbidden(ErrorCode::PostLocked));
    }

    let reply = forum_reply::create(&mut tx, post_id, &user.id, content, is_staff).await?;

    let mut created: Vec<Notification> = Vec::new();
    if is_staff && post.user_id != user.id {
        let message = format!("An admin replied to your post: \"{}\"", post.title);
        let n = notification::insert(
            &mut tx,
            &post.user_id,
            ADMIN_REPLY_TITLE,
            &message,
            NOTIFICATION_ADMIN_REPLY,
            Some(post_id),
        )
        .await?;
        created.push(n);
    }
    commit(tx).await?;

    tracing::info!(
        user_id = %user.id,
        post_id,
        reply_id = reply.id,
        is_admin_reply = reply.is_admin_reply,
        notified = created.len(),
        "Reply created"
    );
    publish_created(hub, created);
    Ok(reply)
}

pub async fn delete_reply(pool: &SqlitePool, user: &CurrentUser, reply_id: i64) -> AppResult<()> {
    let reply = forum_reply::find_by_id(pool, reply_id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::ReplyNotFound, format!("Reply {reply_id} not found"))
    })?;
    if !can_delete(user, &reply.user_id) {
        return Err(AppError::forbidden(ErrorCode::NotOwner));
    }
    forum_reply::delete(pool, reply_id).await?;
    tracing::info!(user_id = %user.id, reply_id, post_id = reply.post_id, "Reply deleted");
    Ok(())
}

fn can_delete(user: &CurrentUser, owner_id: &str) -> bool {
    user.can_manage(owner_id) || user.has_permission(DELETE_POST)
}

async fn find_category(pool: &SqlitePool, id: i64) -> AppResult<ForumCategory> {
    forum_category::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
    })
}

async fn find_post(pool: &SqlitePool, id: i64) -> AppResult<ForumPost> {
    Ok(forum_post::find_by_id(pool, id)
        .await?
        .ok_or_else(|| forum_post::not_found(id))?)
}

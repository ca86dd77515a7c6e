//! Forum Category Repository

use super::RepoResult;
use shared::models::{CategoryListing, ForumCategory};
use sqlx::{Sqlite, SqlitePool};

const COLUMNS: &str = "id, name, slug, description, sort_order, created_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ForumCategory>> {
    let rows = sqlx::query_as::<_, ForumCategory>(&format!(
        "SELECT {COLUMNS} FROM forum_category ORDER BY sort_order, name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Categories in display order with their post counts
pub async fn find_all_with_counts(pool: &SqlitePool) -> RepoResult<Vec<CategoryListing>> {
    let rows = sqlx::query_as::<_, CategoryListing>(
        "SELECT c.id, c.name, c.slug, c.description, c.sort_order, c.created_at, \
                (SELECT COUNT(*) FROM forum_post p WHERE p.category_id = c.id) AS post_count \
         FROM forum_category c ORDER BY c.sort_order, c.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<ForumCategory>> {
    let row = sqlx::query_as::<_, ForumCategory>(&format!(
        "SELECT {COLUMNS} FROM forum_category WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<ForumCategory>> {
    let row = sqlx::query_as::<_, ForumCategory>(&format!(
        "SELECT {COLUMNS} FROM forum_category WHERE slug = ?"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support;

    #[tokio::test]
    async fn seeded_categories_in_sort_order() {
        let pool = test_support::pool().await;
        let rows = find_all_with_counts(&pool).await.unwrap();
        let slugs: Vec<_> = rows.iter().map(|c| c.category.slug.as_str()).collect();
        assert_eq!(slugs, ["announcements", "general", "support"]);
        assert!(rows.iter().all(|c| c.post_count == 0));

        let general = find_by_slug(&pool, "general").await.unwrap().unwrap();
        assert_eq!(general.id, 2);
        assert!(find_by_slug(&pool, "nope").await.unwrap().is_none());
        assert_eq!(find_all(&pool).await.unwrap().len(), 3);
    }
}

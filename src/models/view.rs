// src/models/view.rs

use sqlx::SqlitePool;

/// Deduplicated per-post view counter over the 'views' table. A visitor
/// address is counted at most once per post, ever.
pub struct View;

impl View {
    /// Upsert-with-no-update: repeat views from the same address are no-ops.
    pub async fn record(pool: &SqlitePool, post_id: &str, address: &str) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO views (post_id, address) VALUES (?1, ?2) \
             ON CONFLICT (post_id, address) DO NOTHING",
        )
        .bind(post_id)
        .bind(address)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Only ever queried for published posts; drafts never display a count.
    pub async fn count(pool: &SqlitePool, post_id: &str) -> sqlx::Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM views WHERE post_id = ?1")
            .bind(post_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

// src/models/session.rs

use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

/// Represents the 'sessions' table. The token is the sole bearer credential:
/// possession authenticates as the owning account.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub token: String,
    pub account_id: String,

    /// Client address at creation, used by the registration anti-abuse check.
    pub address: String,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every authenticated use. There is no server-side expiry;
    /// lifetime is bounded only by the cookie max-age.
    pub used_at: DateTime<Utc>,
}

impl Session {
    pub async fn create(
        pool: &SqlitePool,
        account_id: &str,
        address: &str,
        token: &str,
    ) -> sqlx::Result<Session> {
        let now = Utc::now();
        sqlx::query_as(
            "INSERT INTO sessions (id, token, account_id, address, created_at, used_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
             RETURNING *",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(token)
        .bind(account_id)
        .bind(address)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_token(pool: &SqlitePool, token: &str) -> sqlx::Result<Option<Session>> {
        sqlx::query_as("SELECT * FROM sessions WHERE token = ?1")
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Sliding-expiry signal: stamp the session as just used.
    pub async fn touch(pool: &SqlitePool, id: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE sessions SET used_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Sessions from this address used within the last 24 hours. A non-zero
    /// count blocks further account creation from the address.
    pub async fn count_recent_for_address(
        pool: &SqlitePool,
        address: &str,
    ) -> sqlx::Result<i64> {
        let cutoff = Utc::now() - Duration::hours(24);
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE address = ?1 AND used_at > ?2")
                .bind(address)
                .bind(cutoff)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}

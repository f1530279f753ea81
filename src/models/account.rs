// src/models/account.rs

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::is_unique_violation;

/// Represents the 'accounts' table. An account is also a tenant: when
/// `activated` is set, `{username}.{domain}` serves its public blog.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: String,

    /// Unique, lowercase `[0-9a-z]`, doubles as the subdomain key.
    pub username: String,

    /// Unique, lowercase.
    pub email: String,

    /// Argon2 password hash.
    pub password: String,

    pub name: String,
    pub about: Option<String>,
    pub link: Option<String>,

    /// Stored picture reference, resolved by the picture store.
    pub picture: Option<String>,

    /// Custom head-injection HTML for the tenant's public pages.
    pub html: Option<String>,

    /// Gates public visibility of the subdomain site.
    pub activated: bool,

    pub created_at: DateTime<Utc>,
}

/// Outcome of the atomic account creation upsert.
#[derive(Debug)]
pub enum AccountCreate {
    Created(Account),
    UsernameTaken,
    EmailTaken,
}

impl Account {
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<Account>> {
        sqlx::query_as("SELECT * FROM accounts WHERE id = ?1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> sqlx::Result<Option<Account>> {
        sqlx::query_as("SELECT * FROM accounts WHERE username = ?1")
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Login lookup: the identifier may be a username or an email.
    pub async fn find_by_login(
        pool: &SqlitePool,
        identifier: &str,
    ) -> sqlx::Result<Option<Account>> {
        sqlx::query_as("SELECT * FROM accounts WHERE username = ?1 OR email = ?1")
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// Atomic create-or-detect-collision on the username unique index.
    ///
    /// A single upsert inserts the row with a fresh id; on collision the
    /// existing row is returned untouched, so comparing ids tells creator
    /// from loser without a check-then-insert race. An email collision fires
    /// the other unique index and is mapped to its own outcome.
    pub async fn create_if_username_free(
        pool: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> sqlx::Result<AccountCreate> {
        let id = Uuid::new_v4().to_string();
        let result: sqlx::Result<Account> = sqlx::query_as(
            "INSERT INTO accounts (id, username, email, password, name, activated, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, FALSE, ?6) \
             ON CONFLICT (username) DO UPDATE SET username = username \
             RETURNING *",
        )
        .bind(&id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(pool)
        .await;

        match result {
            Ok(account) if account.id == id => Ok(AccountCreate::Created(account)),
            Ok(_) => Ok(AccountCreate::UsernameTaken),
            Err(ref e) if is_unique_violation(e, "accounts.email") => Ok(AccountCreate::EmailTaken),
            Err(e) => Err(e),
        }
    }

    /// Partial profile update. `name = None` keeps the current value; `about`
    /// and `link` are always replaced (None clears them).
    pub async fn update_profile(
        pool: &SqlitePool,
        id: &str,
        name: Option<&str>,
        about: Option<&str>,
        link: Option<&str>,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE accounts SET name = COALESCE(?2, name), about = ?3, link = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(name)
        .bind(about)
        .bind(link)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Returns false when the email is already taken by another account.
    pub async fn update_email(pool: &SqlitePool, id: &str, email: &str) -> sqlx::Result<bool> {
        let result = sqlx::query("UPDATE accounts SET email = ?2 WHERE id = ?1")
            .bind(id)
            .bind(email)
            .execute(pool)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(ref e) if is_unique_violation(e, "accounts.email") => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn update_password(
        pool: &SqlitePool,
        id: &str,
        password_hash: &str,
    ) -> sqlx::Result<()> {
        sqlx::query("UPDATE accounts SET password = ?2 WHERE id = ?1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn update_html(pool: &SqlitePool, id: &str, html: Option<&str>) -> sqlx::Result<()> {
        sqlx::query("UPDATE accounts SET html = ?2 WHERE id = ?1")
            .bind(id)
            .bind(html)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_picture(pool: &SqlitePool, id: &str, reference: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE accounts SET picture = ?2 WHERE id = ?1")
            .bind(id)
            .bind(reference)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn activate(pool: &SqlitePool, id: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE accounts SET activated = TRUE WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

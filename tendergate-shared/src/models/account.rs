/// Account model and database operations
///
/// An account is the unit of tenancy: identity, credentials, a role, and a
/// denormalized profile-completeness percentage. Accounts are created at
/// registration and never deleted by the onboarding core.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE account_role AS ENUM ('standard', 'admin');
///
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     email_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     password_hash VARCHAR(255) NOT NULL,
///     name VARCHAR(255),
///     company_name VARCHAR(255),
///     phone VARCHAR(64),
///     role account_role NOT NULL DEFAULT 'standard',
///     profile_completeness SMALLINT NOT NULL DEFAULT 0,
///     confirmation_token_hash VARCHAR(64),
///     confirmation_sent_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Account role, supplied to the role guard by the authentication layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Regular tender-dashboard account
    Standard,

    /// May reach administrative destinations
    Admin,
}

impl AccountRole {
    /// Gets the role as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Standard => "standard",
            AccountRole::Admin => "admin",
        }
    }

    /// True for accounts allowed through the role guard
    pub fn is_admin(&self) -> bool {
        matches!(self, AccountRole::Admin)
    }
}

/// Account model representing a registered tenant
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The email
/// confirmation token is stored as a SHA-256 hex digest; the raw token only
/// ever travels in the confirmation mail.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT), unique
    pub email: String,

    /// Whether the email address has been confirmed
    pub email_verified: bool,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional contact name
    pub name: Option<String>,

    /// Optional company name (tender applications are filed per company)
    pub company_name: Option<String>,

    /// Optional contact phone number
    pub phone: Option<String>,

    /// Account role consulted by the role guard
    pub role: AccountRole,

    /// Denormalized profile completeness percentage (0-100)
    ///
    /// Recomputed on every profile edit, see [`profile_completeness`]
    pub profile_completeness: i16,

    /// SHA-256 hex digest of the pending email confirmation token
    #[serde(skip_serializing)]
    pub confirmation_token_hash: Option<String>,

    /// When the last confirmation mail was sent
    pub confirmation_sent_at: Option<DateTime<Utc>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the account last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new account
#[derive(Debug, Clone)]
pub struct CreateAccount {
    /// Email address (stored case-insensitively)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Optional contact name
    pub name: Option<String>,

    /// Optional company name
    pub company_name: Option<String>,
}

/// Profile fields editable by the account holder
///
/// Only non-None fields are updated. Profile completeness is recomputed
/// from the resulting row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    /// New contact name
    pub name: Option<String>,

    /// New company name
    pub company_name: Option<String>,

    /// New contact phone number
    pub phone: Option<String>,
}

/// Computes the denormalized profile-completeness percentage
///
/// Four weighted facts: verified email, name, company name, phone.
pub fn profile_completeness(
    email_verified: bool,
    name: Option<&str>,
    company_name: Option<&str>,
    phone: Option<&str>,
) -> i16 {
    let filled = [
        email_verified,
        name.is_some_and(|s| !s.trim().is_empty()),
        company_name.is_some_and(|s| !s.trim().is_empty()),
        phone.is_some_and(|s| !s.trim().is_empty()),
    ]
    .iter()
    .filter(|f| **f)
    .count() as i16;

    filled * 100 / 4
}

impl Account {
    /// Creates a new account
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint) or
    /// the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateAccount) -> Result<Self, sqlx::Error> {
        let completeness = profile_completeness(
            false,
            data.name.as_deref(),
            data.company_name.as_deref(),
            None,
        );

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash, name, company_name, profile_completeness)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, email_verified, password_hash, name, company_name, phone,
                      role, profile_completeness, confirmation_token_hash, confirmation_sent_at,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.company_name)
        .bind(completeness)
        .fetch_one(pool)
        .await?;

        Ok(account)
    }

    /// Finds an account by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, email_verified, password_hash, name, company_name, phone,
                   role, profile_completeness, confirmation_token_hash, confirmation_sent_at,
                   created_at, updated_at, last_login_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds an account by email address (case-insensitive via CITEXT)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, email_verified, password_hash, name, company_name, phone,
                   role, profile_completeness, confirmation_token_hash, confirmation_sent_at,
                   created_at, updated_at, last_login_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Finds the account holding a pending confirmation token digest
    pub async fn find_by_confirmation_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, email_verified, password_hash, name, company_name, phone,
                   role, profile_completeness, confirmation_token_hash, confirmation_sent_at,
                   created_at, updated_at, last_login_at
            FROM accounts
            WHERE confirmation_token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Stores a new confirmation token digest and stamps the send time
    ///
    /// Called on registration and on every "resend confirmation" request;
    /// the previous token is invalidated by the overwrite.
    pub async fn set_confirmation_token(
        pool: &PgPool,
        id: Uuid,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET confirmation_token_hash = $2,
                confirmation_sent_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Marks the email address as verified and consumes the token
    ///
    /// Also refreshes the denormalized completeness percentage, since a
    /// verified email contributes to it. The percentage is recomputed
    /// through [`profile_completeness`] so the weighting lives in one place.
    pub async fn mark_email_verified(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let Some(account) = Self::find_by_id(pool, id).await? else {
            return Ok(false);
        };
        if account.email_verified {
            return Ok(false);
        }

        let completeness = profile_completeness(
            true,
            account.name.as_deref(),
            account.company_name.as_deref(),
            account.phone.as_deref(),
        );

        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET email_verified = TRUE,
                confirmation_token_hash = NULL,
                profile_completeness = $2,
                updated_at = NOW()
            WHERE id = $1 AND email_verified = FALSE
            "#,
        )
        .bind(id)
        .bind(completeness)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates editable profile fields and recomputes completeness
    ///
    /// Returns the updated account, or None if it does not exist.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        let Some(current) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let name = data.name.or(current.name);
        let company_name = data.company_name.or(current.company_name);
        let phone = data.phone.or(current.phone);
        let completeness = profile_completeness(
            current.email_verified,
            name.as_deref(),
            company_name.as_deref(),
            phone.as_deref(),
        );

        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET name = $2,
                company_name = $3,
                phone = $4,
                profile_completeness = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, email_verified, password_hash, name, company_name, phone,
                      role, profile_completeness, confirmation_token_hash, confirmation_sent_at,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(company_name)
        .bind(phone)
        .bind(completeness)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Updates the last login timestamp after successful authentication
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists accounts with pagination, newest first (administrative view)
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, email_verified, password_hash, name, company_name, phone,
                   role, profile_completeness, confirmation_token_hash, confirmation_sent_at,
                   created_at, updated_at, last_login_at
            FROM accounts
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Counts registered accounts
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_strings() {
        assert_eq!(AccountRole::Standard.as_str(), "standard");
        assert_eq!(AccountRole::Admin.as_str(), "admin");
        assert!(AccountRole::Admin.is_admin());
        assert!(!AccountRole::Standard.is_admin());
    }

    #[test]
    fn test_profile_completeness_steps() {
        assert_eq!(profile_completeness(false, None, None, None), 0);
        assert_eq!(profile_completeness(true, None, None, None), 25);
        assert_eq!(profile_completeness(true, Some("A"), None, None), 50);
        assert_eq!(profile_completeness(true, Some("A"), Some("B"), None), 75);
        assert_eq!(
            profile_completeness(true, Some("A"), Some("B"), Some("C")),
            100
        );
    }

    #[test]
    fn test_profile_completeness_ignores_blank_fields() {
        assert_eq!(profile_completeness(false, Some("  "), Some(""), None), 0);
    }

    // Integration tests for database operations live in the api crate's
    // tests/ directory and require a live Postgres.
}

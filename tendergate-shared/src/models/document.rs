/// Qualifying-document records
///
/// Document content is analyzed by an external collaborator; this core only
/// records that a submission happened and what the review outcome currently
/// is. The onboarding gate cares about *presence* of a record, not the
/// outcome; a pending or even rejected document still satisfies the
/// `upload_document` precondition.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE document_review_status AS ENUM ('pending', 'approved', 'rejected');
///
/// CREATE TABLE documents (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     file_name VARCHAR(512) NOT NULL,
///     status document_review_status NOT NULL DEFAULT 'pending',
///     uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Review outcome of a submitted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_review_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentReviewStatus {
    /// Awaiting the external review collaborator
    Pending,

    /// Accepted as a qualifying document
    Approved,

    /// Rejected by review (still counts as a submission for the gate)
    Rejected,
}

/// A submitted qualifying document
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,

    /// Owning account
    pub account_id: Uuid,

    /// Original file name as submitted
    pub file_name: String,

    /// Current review outcome
    pub status: DocumentReviewStatus,

    /// When the document was submitted
    pub uploaded_at: DateTime<Utc>,
}

/// Input for recording a document submission
#[derive(Debug, Clone)]
pub struct CreateDocument {
    /// Owning account
    pub account_id: Uuid,

    /// Original file name
    pub file_name: String,
}

impl Document {
    /// Records a document submission (content handling is external)
    pub async fn create(pool: &PgPool, data: CreateDocument) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (account_id, file_name)
            VALUES ($1, $2)
            RETURNING id, account_id, file_name, status, uploaded_at
            "#,
        )
        .bind(data.account_id)
        .bind(data.file_name)
        .fetch_one(pool)
        .await
    }

    /// Returns the most recent submission for an account, if any
    ///
    /// This is the record surfaced as `documentStatus` in the onboarding
    /// status snapshot.
    pub async fn latest_for_account(
        pool: &PgPool,
        account_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT id, account_id, file_name, status, uploaded_at
            FROM documents
            WHERE account_id = $1
            ORDER BY uploaded_at DESC
            LIMIT 1
            "#,
        )
        .bind(account_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all submissions for an account, newest first
    pub async fn list_for_account(
        pool: &PgPool,
        account_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT id, account_id, file_name, status, uploaded_at
            FROM documents
            WHERE account_id = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(pool)
        .await
    }

    /// Updates the review outcome (administrative review)
    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: DocumentReviewStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE documents SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

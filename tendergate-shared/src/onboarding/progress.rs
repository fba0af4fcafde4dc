/// Persisted onboarding progress
///
/// One row per account holding the authoritative `current_step`. The row is
/// created at registration at `email_verification` and advanced exclusively
/// through [`advance_validated`], which runs the transition validator and
/// then performs a compare-and-set update, so a concurrent duplicate request
/// loses and is reported as a rejection rather than double-advancing.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE onboarding_progress (
///     account_id UUID PRIMARY KEY REFERENCES accounts(id) ON DELETE CASCADE,
///     current_step onboarding_step NOT NULL DEFAULT 'email_verification',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::step::OnboardingStep;
use super::transition::{validate_transition, StepFacts, TransitionError};

/// Failure modes when advancing onboarding progress
#[derive(Debug, thiserror::Error)]
pub enum AdvanceError {
    /// The transition validator rejected the move (recoverable, 4xx)
    #[error(transparent)]
    Rejected(#[from] TransitionError),

    /// The database was unreachable or the statement failed
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Per-account onboarding progress row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OnboardingProgress {
    /// Owning account
    pub account_id: Uuid,

    /// Authoritative current step
    pub current_step: OnboardingStep,

    /// When onboarding began (account creation)
    pub created_at: DateTime<Utc>,

    /// When the step last advanced
    pub updated_at: DateTime<Utc>,
}

impl OnboardingProgress {
    /// Creates the progress row for a freshly registered account
    ///
    /// Idempotent: re-running for an existing account leaves its progress
    /// untouched.
    pub async fn create(pool: &PgPool, account_id: Uuid) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, OnboardingProgress>(
            r#"
            INSERT INTO onboarding_progress (account_id)
            VALUES ($1)
            ON CONFLICT (account_id) DO UPDATE SET account_id = EXCLUDED.account_id
            RETURNING account_id, current_step, created_at, updated_at
            "#,
        )
        .bind(account_id)
        .fetch_one(pool)
        .await
    }

    /// Fetches the progress row for an account
    pub async fn get(pool: &PgPool, account_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, OnboardingProgress>(
            r#"
            SELECT account_id, current_step, created_at, updated_at
            FROM onboarding_progress
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(pool)
        .await
    }

    /// Fetches the progress row, creating it at `email_verification` if the
    /// account predates the row (or registration was interrupted)
    pub async fn get_or_create(pool: &PgPool, account_id: Uuid) -> Result<Self, sqlx::Error> {
        if let Some(progress) = Self::get(pool, account_id).await? {
            return Ok(progress);
        }
        Self::create(pool, account_id).await
    }

    /// Counts accounts whose onboarding has reached the terminal step
    pub async fn count_completed(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM onboarding_progress WHERE current_step = 'completed'",
        )
        .fetch_one(pool)
        .await?;

        Ok(count.0)
    }
}

/// Validates a requested transition and, on acceptance, persists it
///
/// The update is guarded by the expected current step
/// (`WHERE current_step = $from`); if a concurrent request advanced the row
/// first, this one re-reads and is rejected as stale. The caller re-fetches
/// the status snapshot afterwards; persisting and observing are always
/// sequenced, never assumed.
///
/// # Errors
///
/// [`AdvanceError::Rejected`] with the validator's reason, or
/// [`AdvanceError::Database`] on infrastructure failure.
pub async fn advance_validated(
    pool: &PgPool,
    account_id: Uuid,
    claimed_from: OnboardingStep,
    requested_to: OnboardingStep,
    facts: StepFacts,
) -> Result<OnboardingProgress, AdvanceError> {
    let progress = OnboardingProgress::get_or_create(pool, account_id).await?;

    validate_transition(progress.current_step, claimed_from, requested_to, facts)?;

    let updated = sqlx::query_as::<_, OnboardingProgress>(
        r#"
        UPDATE onboarding_progress
        SET current_step = $3, updated_at = NOW()
        WHERE account_id = $1 AND current_step = $2
        RETURNING account_id, current_step, created_at, updated_at
        "#,
    )
    .bind(account_id)
    .bind(progress.current_step)
    .bind(requested_to)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(progress) => {
            tracing::info!(
                account_id = %account_id,
                from = %claimed_from,
                to = %requested_to,
                "onboarding step advanced"
            );
            Ok(progress)
        }
        None => {
            // Lost a race: another request advanced the row between our read
            // and the compare-and-set. Report the fresh state as stale-step.
            let actual = OnboardingProgress::get_or_create(pool, account_id).await?;
            Err(AdvanceError::Rejected(TransitionError::StaleStep {
                claimed: claimed_from,
                actual: actual.current_step,
            }))
        }
    }
}

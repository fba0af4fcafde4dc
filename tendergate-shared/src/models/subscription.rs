/// Subscription plan records
///
/// Billing itself is an external collaborator; this core records which plan
/// an account selected so the status snapshot can report `hasSubscription`.
/// The `choose_plan` onboarding step is explicitly skippable, so absence of
/// a row is a normal state.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE subscription_plan AS ENUM ('starter', 'professional', 'enterprise');
/// CREATE TYPE subscription_status AS ENUM ('active', 'canceled');
///
/// CREATE TABLE subscriptions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     plan subscription_plan NOT NULL,
///     status subscription_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Available subscription plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_plan", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Starter,
    Professional,
    Enterprise,
}

impl SubscriptionPlan {
    /// All selectable plans
    pub const ALL: [SubscriptionPlan; 3] = [
        SubscriptionPlan::Starter,
        SubscriptionPlan::Professional,
        SubscriptionPlan::Enterprise,
    ];

    /// Gets the plan as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Starter => "starter",
            SubscriptionPlan::Professional => "professional",
            SubscriptionPlan::Enterprise => "enterprise",
        }
    }
}

/// Lifecycle state of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
}

/// A plan selection made by an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    /// Unique subscription ID
    pub id: Uuid,

    /// Owning account
    pub account_id: Uuid,

    /// Selected plan
    pub plan: SubscriptionPlan,

    /// Lifecycle state
    pub status: SubscriptionStatus,

    /// When the plan was selected
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Records a plan selection; any previous active selection is canceled
    pub async fn select_plan(
        pool: &PgPool,
        account_id: Uuid,
        plan: SubscriptionPlan,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE subscriptions SET status = 'canceled' WHERE account_id = $1 AND status = 'active'",
        )
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (account_id, plan)
            VALUES ($1, $2)
            RETURNING id, account_id, plan, status, created_at
            "#,
        )
        .bind(account_id)
        .bind(plan)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(subscription)
    }

    /// Returns the account's active subscription, if any
    pub async fn active_for_account(
        pool: &PgPool,
        account_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, account_id, plan, status, created_at
            FROM subscriptions
            WHERE account_id = $1 AND status = 'active'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(account_id)
        .fetch_optional(pool)
        .await
    }

    /// True when the account holds an active subscription
    pub async fn has_active(pool: &PgPool, account_id: Uuid) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM subscriptions WHERE account_id = $1 AND status = 'active')",
        )
        .bind(account_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_wire_strings() {
        for plan in SubscriptionPlan::ALL {
            let json = serde_json::to_string(&plan).unwrap();
            assert_eq!(json, format!("\"{}\"", plan.as_str()));
        }
    }
}

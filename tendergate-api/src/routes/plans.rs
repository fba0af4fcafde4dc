/// Subscription plan endpoints
///
/// Plan selection records a subscription row; billing itself is an external
/// collaborator. Both the `choose_plan` and `payment` steps are skippable,
/// so neither a subscription nor a completed payment gates onboarding
/// completion.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Extension, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tendergate_shared::{
    auth::session::CurrentAccount,
    models::subscription::{Subscription, SubscriptionPlan},
};

/// One plan in the catalog response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanView {
    /// Plan identity
    pub plan: SubscriptionPlan,

    /// Display name
    pub name: &'static str,

    /// Monthly price in euro cents
    pub monthly_price_cents: u32,
}

/// Plan catalog response
#[derive(Debug, Serialize)]
pub struct PlanListResponse {
    /// Available plans
    pub plans: Vec<PlanView>,
}

/// Plan selection request
#[derive(Debug, Deserialize)]
pub struct SelectPlanRequest {
    /// The chosen plan
    pub plan: SubscriptionPlan,
}

/// Plan selection response
#[derive(Debug, Serialize)]
pub struct SelectPlanResponse {
    /// Always true
    pub success: bool,

    /// The recorded subscription
    pub subscription: Subscription,
}

fn catalog_entry(plan: SubscriptionPlan) -> PlanView {
    let (name, monthly_price_cents) = match plan {
        SubscriptionPlan::Starter => ("Starter", 4900),
        SubscriptionPlan::Professional => ("Professional", 14900),
        SubscriptionPlan::Enterprise => ("Enterprise", 39900),
    };

    PlanView {
        plan,
        name,
        monthly_price_cents,
    }
}

/// Lists the available plans
///
/// # Endpoint
///
/// ```text
/// GET /v1/plans
/// ```
pub async fn list_plans() -> Json<PlanListResponse> {
    Json(PlanListResponse {
        plans: SubscriptionPlan::ALL.iter().copied().map(catalog_entry).collect(),
    })
}

/// Records a plan selection for the signed-in account
///
/// Any previously active selection is canceled in the same transaction.
///
/// # Endpoint
///
/// ```text
/// POST /v1/plans/select
/// Content-Type: application/json
///
/// { "plan": "professional" }
/// ```
pub async fn select_plan(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(req): Json<SelectPlanRequest>,
) -> ApiResult<Json<SelectPlanResponse>> {
    let subscription = Subscription::select_plan(&state.db, current.account_id, req.plan).await?;

    tracing::info!(
        account_id = %current.account_id,
        plan = %subscription.plan.as_str(),
        "subscription plan selected"
    );

    Ok(Json(SelectPlanResponse {
        success: true,
        subscription,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_all_plans() {
        let plans: Vec<PlanView> = SubscriptionPlan::ALL
            .iter()
            .copied()
            .map(catalog_entry)
            .collect();

        assert_eq!(plans.len(), 3);
        assert!(plans.windows(2).all(|w| w[0].monthly_price_cents < w[1].monthly_price_cents));
    }
}

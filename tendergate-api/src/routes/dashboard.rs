/// Dashboard endpoint
///
/// The main protected destination. Reaching this handler at all means the
/// route guard has already verified the session and a completed onboarding
/// snapshot; the handler itself only assembles the overview.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;
use tendergate_shared::{
    auth::session::CurrentAccount,
    models::{account::Account, document::Document, subscription::Subscription},
};

/// Dashboard overview response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Account email
    pub email: String,

    /// Contact name
    pub name: Option<String>,

    /// Company the tenders are filed under
    pub company_name: Option<String>,

    /// Profile completeness percentage (0-100)
    pub profile_completeness: i16,

    /// Active plan name, if a subscription exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_plan: Option<String>,

    /// Number of submitted qualification documents
    pub document_count: usize,
}

/// Returns the dashboard overview for the signed-in account
///
/// # Endpoint
///
/// ```text
/// GET /v1/dashboard
/// ```
pub async fn overview(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<DashboardResponse>> {
    let account = Account::find_by_id(&state.db, current.account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let subscription = Subscription::active_for_account(&state.db, current.account_id).await?;
    let documents = Document::list_for_account(&state.db, current.account_id).await?;

    Ok(Json(DashboardResponse {
        email: account.email,
        name: account.name,
        company_name: account.company_name,
        profile_completeness: account.profile_completeness,
        active_plan: subscription.map(|s| s.plan.as_str().to_string()),
        document_count: documents.len(),
    }))
}

/// Administrative endpoints
///
/// Role-guarded: session + admin role, no onboarding requirement. These are
/// read-only views over the account base.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tendergate_shared::{
    models::{
        account::{Account, AccountRole},
        document::{Document, DocumentReviewStatus},
    },
    onboarding::OnboardingProgress,
};
use uuid::Uuid;

/// Pagination parameters
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Page size (default 50, capped at 200)
    pub limit: Option<i64>,

    /// Offset into the listing
    pub offset: Option<i64>,
}

/// One account in the administrative listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    /// Account ID
    pub account_id: Uuid,

    /// Email address
    pub email: String,

    /// Whether the email is confirmed
    pub email_verified: bool,

    /// Company name
    pub company_name: Option<String>,

    /// Account role
    pub role: AccountRole,

    /// Profile completeness percentage
    pub profile_completeness: i16,

    /// Registration time
    pub created_at: DateTime<Utc>,
}

/// Account listing response
#[derive(Debug, Serialize)]
pub struct ListAccountsResponse {
    /// Page of accounts, newest first
    pub accounts: Vec<AccountSummary>,

    /// Total number of accounts
    pub total: i64,
}

/// Administrative overview response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverviewResponse {
    /// Total number of accounts
    pub total_accounts: i64,

    /// Accounts with completed onboarding
    pub completed_onboarding: i64,
}

/// Lists accounts, newest first, paginated
///
/// # Endpoint
///
/// ```text
/// GET /v1/admin/accounts?limit=50&offset=0
/// ```
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> ApiResult<Json<ListAccountsResponse>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let accounts = Account::list(&state.db, limit, offset).await?;
    let total = Account::count(&state.db).await?;

    let accounts = accounts
        .into_iter()
        .map(|a| AccountSummary {
            account_id: a.id,
            email: a.email,
            email_verified: a.email_verified,
            company_name: a.company_name,
            role: a.role,
            profile_completeness: a.profile_completeness,
            created_at: a.created_at,
        })
        .collect();

    Ok(Json(ListAccountsResponse { accounts, total }))
}

/// Document review request
#[derive(Debug, Deserialize)]
pub struct ReviewDocumentRequest {
    /// The review outcome to record
    pub status: DocumentReviewStatus,
}

/// Document review response
#[derive(Debug, Serialize)]
pub struct ReviewDocumentResponse {
    /// Always true
    pub success: bool,
}

/// Records a review outcome for a submitted document
///
/// The review itself happens outside this system; this endpoint records the
/// verdict, which the onboarding snapshot then surfaces as `documentStatus`.
///
/// # Endpoint
///
/// ```text
/// POST /v1/admin/documents/:id/review
/// Content-Type: application/json
///
/// { "status": "approved" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No document with that ID
pub async fn review_document(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    Json(req): Json<ReviewDocumentRequest>,
) -> ApiResult<Json<ReviewDocumentResponse>> {
    let updated = Document::set_status(&state.db, document_id, req.status).await?;
    if !updated {
        return Err(ApiError::NotFound("Document not found".to_string()));
    }

    tracing::info!(
        document_id = %document_id,
        status = ?req.status,
        "document review recorded"
    );

    Ok(Json(ReviewDocumentResponse { success: true }))
}

/// Returns onboarding funnel counts
///
/// # Endpoint
///
/// ```text
/// GET /v1/admin/overview
/// ```
pub async fn overview(State(state): State<AppState>) -> ApiResult<Json<AdminOverviewResponse>> {
    let total_accounts = Account::count(&state.db).await?;
    let completed_onboarding = OnboardingProgress::count_completed(&state.db).await?;

    Ok(Json(AdminOverviewResponse {
        total_accounts,
        completed_onboarding,
    }))
}

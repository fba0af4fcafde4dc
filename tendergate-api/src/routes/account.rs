/// Account profile endpoints
///
/// Route-guarded: reachable only with a session and completed onboarding.
/// Profile edits recompute the denormalized completeness percentage.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Extension, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tendergate_shared::{
    auth::session::CurrentAccount,
    models::account::{Account, AccountRole, UpdateProfile},
};
use uuid::Uuid;

/// Profile response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Account ID
    pub account_id: Uuid,

    /// Email address
    pub email: String,

    /// Whether the email address is confirmed
    pub email_verified: bool,

    /// Contact name
    pub name: Option<String>,

    /// Company name
    pub company_name: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Account role
    pub role: AccountRole,

    /// Profile completeness percentage (0-100)
    pub profile_completeness: i16,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account last logged in
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<Account> for ProfileResponse {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.id,
            email: account.email,
            email_verified: account.email_verified,
            name: account.name,
            company_name: account.company_name,
            phone: account.phone,
            role: account.role,
            profile_completeness: account.profile_completeness,
            created_at: account.created_at,
            last_login_at: account.last_login_at,
        }
    }
}

/// Returns the signed-in account's profile
///
/// # Endpoint
///
/// ```text
/// GET /v1/account/profile
/// ```
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<ProfileResponse>> {
    let account = Account::find_by_id(&state.db, current.account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    Ok(Json(account.into()))
}

/// Updates editable profile fields
///
/// Only the fields present in the body change; `profileCompleteness` is
/// recomputed from the resulting row.
///
/// # Endpoint
///
/// ```text
/// PATCH /v1/account/profile
/// Content-Type: application/json
///
/// { "name": "Jane Doe", "phone": "+31 6 1234 5678" }
/// ```
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(req): Json<UpdateProfile>,
) -> ApiResult<Json<ProfileResponse>> {
    let account = Account::update_profile(&state.db, current.account_id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    Ok(Json(account.into()))
}

/// Authentication endpoints
///
/// Registration, login, logout, and the email-confirmation flow. Sessions
/// are established as an HttpOnly cookie; the raw confirmation token only
/// ever leaves the system inside the mail link, with a SHA-256 digest at
/// rest.
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Create account + onboarding progress row
/// - `POST /v1/auth/login` - Verify credentials, set session cookie
/// - `POST /v1/auth/logout` - Clear session cookie
/// - `POST /v1/resend-confirmation` - Re-issue the confirmation token
/// - `GET /v1/confirm-email?token=...` - Verify email, advance onboarding

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Extension, Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use tendergate_shared::{
    auth::{
        confirmation::{generate_confirmation_token, hash_confirmation_token},
        jwt, password,
        session::{clear_session_cookie, session_cookie, CurrentAccount},
    },
    models::account::{Account, CreateAccount},
    onboarding::{advance_validated, OnboardingProgress, OnboardingStatus, OnboardingStep},
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (will be validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional contact name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    /// Optional company name
    #[validate(length(max = 200, message = "Company name must be at most 200 characters"))]
    pub company_name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Session response, returned by register and login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Account ID
    pub account_id: Uuid,

    /// Account email
    pub email: String,

    /// Current onboarding snapshot
    pub status: OnboardingStatus,
}

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    /// Always true
    pub success: bool,
}

/// Confirm-email query parameters
#[derive(Debug, Deserialize)]
pub struct ConfirmEmailQuery {
    /// Raw confirmation token from the mail link
    pub token: String,
}

fn validation_details(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}

/// Issues a confirmation token for the account and mails the link
///
/// Delivery failure is logged but does not fail the caller; the token is
/// persisted either way and "resend confirmation" recovers.
async fn issue_and_mail_confirmation(state: &AppState, account: &Account) -> ApiResult<()> {
    let token = generate_confirmation_token();
    Account::set_confirmation_token(&state.db, account.id, &token.hash).await?;

    let confirm_url = state.config.confirmation_url(&token.raw);
    if let Err(e) = state.mailer.send_confirmation(&account.email, &confirm_url).await {
        tracing::warn!(
            account_id = %account.id,
            error = %e,
            "confirmation mail delivery failed"
        );
    }

    Ok(())
}

/// Register a new account
///
/// Creates the account at the `email_verification` onboarding step and sends
/// the confirmation mail. A session is established immediately so the new
/// account lands on the onboarding flow, not the sign-in form.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "bidder@example.com",
///   "password": "SecureP@ss123",
///   "name": "Jane Doe",
///   "companyName": "Doe Construction Ltd"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(HeaderMap, Json<SessionResponse>)> {
    req.validate().map_err(validation_details)?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let account = Account::create(
        &state.db,
        CreateAccount {
            email: req.email.clone(),
            password_hash,
            name: req.name.clone(),
            company_name: req.company_name.clone(),
        },
    )
    .await?;

    // Every account gets a progress row at the first step.
    OnboardingProgress::create(&state.db, account.id).await?;

    issue_and_mail_confirmation(&state, &account).await?;

    let token = jwt::issue_session_token(account.id, account.role, state.jwt_secret())?;
    let status = OnboardingStatus::load(&state.db, account.id).await?;

    tracing::info!(account_id = %account.id, "account registered");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&token)
            .parse()
            .map_err(|_| ApiError::InternalError("invalid cookie value".to_string()))?,
    );

    Ok((
        headers,
        Json(SessionResponse {
            account_id: account.id,
            email: account.email,
            status,
        }),
    ))
}

/// Login
///
/// Verifies credentials and sets the session cookie. The response includes
/// the onboarding snapshot so the client can route immediately (onboarding
/// vs dashboard) without a second round trip.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(HeaderMap, Json<SessionResponse>)> {
    req.validate().map_err(validation_details)?;

    // Same error for unknown email and wrong password.
    let account = Account::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &account.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    Account::update_last_login(&state.db, account.id).await?;

    let token = jwt::issue_session_token(account.id, account.role, state.jwt_secret())?;
    let status = OnboardingStatus::load(&state.db, account.id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&token)
            .parse()
            .map_err(|_| ApiError::InternalError("invalid cookie value".to_string()))?,
    );

    Ok((
        headers,
        Json(SessionResponse {
            account_id: account.id,
            email: account.email,
            status,
        }),
    ))
}

/// Logout
///
/// Clears the session cookie. Stateless sessions mean there is nothing to
/// revoke server-side; the token simply ages out.
pub async fn logout() -> ApiResult<(HeaderMap, Json<SuccessResponse>)> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        clear_session_cookie()
            .parse()
            .map_err(|_| ApiError::InternalError("invalid cookie value".to_string()))?,
    );

    Ok((headers, Json(SuccessResponse { success: true })))
}

/// Resend the confirmation mail
///
/// Re-issues the token (invalidating the previous one) and re-sends the
/// mail. A no-op for accounts that are already verified.
///
/// # Endpoint
///
/// ```text
/// POST /v1/resend-confirmation
/// ```
pub async fn resend_confirmation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<SuccessResponse>> {
    let account = Account::find_by_id(&state.db, current.account_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Session account no longer exists".to_string()))?;

    if account.email_verified {
        return Ok(Json(SuccessResponse { success: true }));
    }

    issue_and_mail_confirmation(&state, &account).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Confirm an email address
///
/// Terminal for the mail link: looks the account up by token digest, marks
/// the address verified, and advances `email_verification ->
/// upload_document` through the transition validator. The token is consumed
/// on success, so a second click reports an invalid token.
///
/// # Endpoint
///
/// ```text
/// GET /v1/confirm-email?token=<raw token from the mail>
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Unknown, already-used, or malformed token
pub async fn confirm_email(
    State(state): State<AppState>,
    Query(query): Query<ConfirmEmailQuery>,
) -> ApiResult<Json<SuccessResponse>> {
    if query.token.is_empty() {
        return Err(ApiError::BadRequest("Missing confirmation token".to_string()));
    }

    let token_hash = hash_confirmation_token(&query.token);
    let account = Account::find_by_confirmation_token_hash(&state.db, &token_hash)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest("Invalid or already-used confirmation token".to_string())
        })?;

    Account::mark_email_verified(&state.db, account.id).await?;

    // Verification is the precondition for leaving the first step, so the
    // advance happens here. The snapshot the client sees next reflects it.
    let status = OnboardingStatus::load(&state.db, account.id).await?;
    advance_validated(
        &state.db,
        account.id,
        OnboardingStep::EmailVerification,
        OnboardingStep::UploadDocument,
        status.facts(),
    )
    .await?;

    tracing::info!(account_id = %account.id, "email confirmed");

    Ok(Json(SuccessResponse { success: true }))
}

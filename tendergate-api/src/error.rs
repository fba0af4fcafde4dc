/// Error handling for the API server
///
/// Unified error type that maps to HTTP responses. Handlers return
/// `ApiResult<T>`; the taxonomy follows the access-control design: guards
/// fail closed (`503` when onboarding status cannot be resolved), transition
/// rejections are recoverable `409`s that never end the session, and
/// internal details are logged but not leaked to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use tendergate_shared::auth::jwt::JwtError;
use tendergate_shared::auth::password::PasswordError;
use tendergate_shared::auth::session::SessionError;
use tendergate_shared::mail::MailError;
use tendergate_shared::onboarding::{AdvanceError, StatusError, TransitionError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g. duplicate email
    Conflict(String),

    /// Transition rejected by the onboarding validator (409)
    ///
    /// Recoverable: the message is surfaced verbatim so the account holder
    /// can see which precondition is unmet; persisted state is unchanged.
    InvalidTransition(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503) - e.g. status store unreachable
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "unauthorized", "invalid_transition")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InvalidTransition(msg) => write!(f, "Invalid transition: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::InvalidTransition(msg) => {
                (StatusCode::CONFLICT, "invalid_transition", msg, None)
            }
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None)
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert session errors to API errors (the 401 flavor; guards translate
/// the same failures into redirects instead)
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingCredentials => {
                ApiError::Unauthorized("Missing session credentials".to_string())
            }
            SessionError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            SessionError::InvalidToken(msg) => ApiError::Unauthorized(msg),
        }
    }
}

/// Convert transition rejections to API errors
impl From<TransitionError> for ApiError {
    fn from(err: TransitionError) -> Self {
        ApiError::InvalidTransition(err.to_string())
    }
}

/// Convert advance failures to API errors
impl From<AdvanceError> for ApiError {
    fn from(err: AdvanceError) -> Self {
        match err {
            AdvanceError::Rejected(e) => ApiError::from(e),
            AdvanceError::Database(e) => ApiError::from(e),
        }
    }
}

/// Convert status-fetch failures to API errors
///
/// The status store being unreachable is a `503`; the guard fails closed on
/// the same condition.
impl From<StatusError> for ApiError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::AccountNotFound(_) => {
                ApiError::Unauthorized("Session account no longer exists".to_string())
            }
            StatusError::Database(e) => {
                tracing::warn!("onboarding status fetch failed: {}", e);
                ApiError::ServiceUnavailable(
                    "Onboarding status is temporarily unavailable".to_string(),
                )
            }
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Session has expired".to_string()),
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            JwtError::ValidationError(msg) => ApiError::Unauthorized(msg),
        }
    }
}

/// Convert mail errors to API errors
impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        ApiError::ServiceUnavailable(format!("Mail delivery failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tendergate_shared::onboarding::OnboardingStep;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Account not found".to_string());
        assert_eq!(err.to_string(), "Not found: Account not found");
    }

    #[test]
    fn test_transition_rejection_maps_to_conflict() {
        let err = ApiError::from(TransitionError::NotNextStep {
            from: OnboardingStep::EmailVerification,
            to: OnboardingStep::Payment,
        });

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_status_fetch_failure_is_service_unavailable() {
        let err = ApiError::from(StatusError::Database(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![ValidationErrorDetail {
            field: "email".to_string(),
            message: "Invalid email format".to_string(),
        }];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 1 errors");
    }
}

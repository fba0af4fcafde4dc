/// Session extraction for Axum
///
/// Sessions arrive in the `tg_session` cookie (browser clients) or as an
/// `Authorization: Bearer` token (API clients). Extraction validates the
/// token and yields a [`CurrentAccount`]; the middleware variant rejects
/// with `401` for JSON endpoints, while the route/role guards in the api
/// crate translate the same failure into a sign-in redirect.
///
/// # Request Extensions
///
/// After successful authentication the middleware adds `CurrentAccount`
/// (account ID and role) to the request extensions.

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::account::AccountRole;

use super::jwt::{validate_session_token, JwtError};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "tg_session";

/// Error type for session extraction
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No cookie and no bearer token on the request
    #[error("missing session credentials")]
    MissingCredentials,

    /// Credentials were present but malformed
    #[error("invalid session format: {0}")]
    InvalidFormat(String),

    /// Token validation failed (bad signature, expired, wrong issuer)
    #[error("invalid session: {0}")]
    InvalidToken(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            SessionError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing session credentials").into_response()
            }
            SessionError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            SessionError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

/// The signed-in account, added to request extensions by the session layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurrentAccount {
    /// Authenticated account ID
    pub account_id: Uuid,

    /// Account role, as asserted by the session token
    pub role: AccountRole,
}

/// Pulls the raw session token from the request headers
///
/// Checks the `tg_session` cookie first, then falls back to an
/// `Authorization: Bearer` header.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie_header) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        let prefix = format!("{}=", SESSION_COOKIE);
        for pair in cookie_header.split(';') {
            if let Some(value) = pair.trim().strip_prefix(&prefix) {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

/// Resolves the signed-in account from request headers
///
/// # Errors
///
/// `MissingCredentials` when no token is present, `InvalidToken` when
/// validation fails. Callers decide between `401` and a redirect.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<CurrentAccount, SessionError> {
    let token = extract_session_token(headers).ok_or(SessionError::MissingCredentials)?;

    let claims = validate_session_token(&token, secret).map_err(|e| match e {
        JwtError::Expired => SessionError::InvalidToken("session has expired".to_string()),
        e => SessionError::InvalidToken(e.to_string()),
    })?;

    Ok(CurrentAccount {
        account_id: claims.sub,
        role: claims.role,
    })
}

/// Session middleware for JSON endpoints
///
/// Rejects with `401` when the session is missing or invalid; on success
/// inserts [`CurrentAccount`] into the request extensions.
pub async fn session_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, SessionError> {
    let account = authenticate(req.headers(), &secret)?;
    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}

/// Builds the `Set-Cookie` value that establishes a session
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400",
        SESSION_COOKIE, token
    )
}

/// Builds the `Set-Cookie` value that clears the session
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::issue_session_token;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extracts_token_from_cookie() {
        let headers = headers_with_cookie("theme=dark; tg_session=abc123; lang=lv");
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_falls_back_to_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer xyz789"),
        );
        assert_eq!(extract_session_token(&headers).as_deref(), Some("xyz789"));
    }

    #[test]
    fn test_empty_cookie_value_is_ignored() {
        let headers = headers_with_cookie("tg_session=");
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn test_authenticate_round_trip() {
        let account_id = Uuid::new_v4();
        let token = issue_session_token(account_id, AccountRole::Standard, SECRET).unwrap();
        let headers = headers_with_cookie(&format!("tg_session={}", token));

        let current = authenticate(&headers, SECRET).unwrap();
        assert_eq!(current.account_id, account_id);
        assert_eq!(current.role, AccountRole::Standard);
    }

    #[test]
    fn test_authenticate_missing_credentials() {
        let headers = HeaderMap::new();
        assert!(matches!(
            authenticate(&headers, SECRET),
            Err(SessionError::MissingCredentials)
        ));
    }

    #[test]
    fn test_authenticate_rejects_forged_token() {
        let token = issue_session_token(
            Uuid::new_v4(),
            AccountRole::Admin,
            "some-other-secret-that-is-long-enough",
        )
        .unwrap();
        let headers = headers_with_cookie(&format!("tg_session={}", token));

        assert!(matches!(
            authenticate(&headers, SECRET),
            Err(SessionError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_cookie_builders() {
        assert!(session_cookie("tok").starts_with("tg_session=tok;"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}

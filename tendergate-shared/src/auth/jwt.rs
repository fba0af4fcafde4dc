/// Session token generation and validation
///
/// Sessions are HS256-signed JWTs carried in the `tg_session` cookie (or an
/// `Authorization: Bearer` header for API clients). The claims carry the
/// account identity and its role; the role is what the role guard consults,
/// supplied here by the authentication layer rather than re-read per request.
///
/// # Example
///
/// ```
/// use tendergate_shared::auth::jwt::{issue_session_token, validate_session_token, SessionClaims};
/// use tendergate_shared::models::account::AccountRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let account_id = Uuid::new_v4();
///
/// let token = issue_session_token(account_id, AccountRole::Standard, secret)?;
/// let claims = validate_session_token(&token, secret)?;
/// assert_eq!(claims.sub, account_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::account::AccountRole;

/// Token issuer claim value
const ISSUER: &str = "tendergate";

/// Session lifetime
const SESSION_TTL_HOURS: i64 = 24;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign the token
    #[error("failed to create session token: {0}")]
    CreateError(String),

    /// Signature, issuer, or structural validation failed
    #[error("failed to validate session token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("session has expired")]
    Expired,
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: account ID
    pub sub: Uuid,

    /// Issuer, always "tendergate"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Account role (custom claim, consulted by the role guard)
    pub role: AccountRole,
}

impl SessionClaims {
    /// Creates claims for a fresh session with the default lifetime
    pub fn new(account_id: Uuid, role: AccountRole) -> Self {
        Self::with_lifetime(account_id, role, Duration::hours(SESSION_TTL_HOURS))
    }

    /// Creates claims with a custom lifetime
    pub fn with_lifetime(account_id: Uuid, role: AccountRole, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            nbf: now.timestamp(),
            role,
        }
    }

    /// Checks if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Issues a signed session token for an authenticated account
///
/// # Errors
///
/// Returns `JwtError::CreateError` if signing fails.
pub fn issue_session_token(
    account_id: Uuid,
    role: AccountRole,
    secret: &str,
) -> Result<String, JwtError> {
    let claims = SessionClaims::new(account_id, role);
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, &claims, &key)
        .map_err(|e| JwtError::CreateError(format!("token encoding failed: {}", e)))
}

/// Validates a session token and extracts its claims
///
/// Verifies the signature, expiration, `nbf`, and the `tendergate` issuer.
///
/// # Errors
///
/// `JwtError::Expired` for an expired session, `JwtError::ValidationError`
/// for any other validation failure.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data =
        decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::ValidationError(format!("token validation failed: {}", e)),
        })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_issue_and_validate_round_trip() {
        let account_id = Uuid::new_v4();
        let token = issue_session_token(account_id, AccountRole::Admin, SECRET).unwrap();

        let claims = validate_session_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, account_id);
        assert_eq!(claims.role, AccountRole::Admin);
        assert_eq!(claims.iss, "tendergate");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_session_token(Uuid::new_v4(), AccountRole::Standard, SECRET).unwrap();

        let result = validate_session_token(&token, "another-secret-that-is-long-enough!!");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let claims = SessionClaims::with_lifetime(
            Uuid::new_v4(),
            AccountRole::Standard,
            Duration::seconds(-120),
        );
        let header = Header::new(Algorithm::HS256);
        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(claims.is_expired());
        assert!(matches!(
            validate_session_token(&token, SECRET),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let result = validate_session_token("not.a.token", SECRET);
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }
}

/// Authentication and access-control utilities
///
/// This module provides the authentication primitives for Tendergate:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: HS256 session token generation and validation
/// - [`session`]: session-cookie/bearer extraction and middleware
/// - [`confirmation`]: email confirmation token generation and hashing
/// - [`guard`]: pure route-guard and role-guard decisions
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id, PHC string format
/// - **Sessions**: HS256-signed JWTs in an HttpOnly cookie
/// - **Confirmation Tokens**: random 32-byte tokens, SHA-256 digest at rest
/// - **Fail Closed**: guards withhold protected destinations on any
///   uncertainty about auth or onboarding completeness

pub mod confirmation;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod session;

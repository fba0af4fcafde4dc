/// Guard middleware
///
/// - `route_guard`: wraps every protected, non-onboarding destination.
///   Session check, fresh onboarding-status fetch, redirect or render.
/// - `role_guard`: wraps administrative destinations. Session and role
///   check only, deliberately no onboarding consultation.
///
/// Both translate failures into redirects (navigation semantics); JSON
/// endpoints use the shared session middleware and answer `401` instead.

pub mod role_guard;
pub mod route_guard;

/// Sign-in destination for unauthenticated navigation
pub const LOGIN_PATH: &str = "/login";

/// Onboarding destination for authenticated-but-incomplete accounts
pub const ONBOARDING_PATH: &str = "/onboarding";

/// Standard dashboard destination (role-guard fallback)
pub const DASHBOARD_PATH: &str = "/dashboard";

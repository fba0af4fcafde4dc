/// Route guard for protected destinations
///
/// Evaluated on every navigation attempt, in two strictly ordered phases:
///
/// 1. Session resolution. No valid session redirects to the sign-in
///    destination; the status store is never consulted for anonymous
///    requests.
/// 2. Status resolution. The onboarding snapshot is fetched fresh from the
///    status store for this request. The destination handler is not invoked
///    until the fetch resolves; a failed fetch withholds the destination
///    (`503`) rather than failing open, and `completed == false` redirects
///    to the onboarding destination regardless of what was requested.
///
/// The onboarding destination itself is exempt by construction: this layer
/// is simply not mounted on the onboarding routes, which use the plain
/// session middleware instead.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use tendergate_shared::auth::guard::{route_decision, RouteDecision};
use tendergate_shared::auth::session::authenticate;
use tendergate_shared::onboarding::OnboardingStatus;

use crate::app::AppState;
use crate::error::ApiError;

use super::{LOGIN_PATH, ONBOARDING_PATH};

/// Route-guard middleware layer
pub async fn route_guard(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    // Phase 1: resolve the session. Failures become a sign-in redirect, and
    // no status fetch happens for anonymous requests.
    let session = match authenticate(req.headers(), state.jwt_secret()) {
        Ok(account) => account,
        Err(_) => return Redirect::to(LOGIN_PATH).into_response(),
    };

    // Phase 2: resolve onboarding status, fresh from the store. The request
    // is held here until the fetch completes; there is no optimistic
    // pass-through to correct afterwards.
    let status = match OnboardingStatus::load(&state.db, session.account_id).await {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!(
                account_id = %session.account_id,
                error = %e,
                "onboarding status fetch failed during route guard"
            );
            None
        }
    };

    match route_decision(Some(&session), status.as_ref()) {
        RouteDecision::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
        RouteDecision::RedirectToOnboarding => Redirect::to(ONBOARDING_PATH).into_response(),
        RouteDecision::StatusUnavailable => ApiError::ServiceUnavailable(
            "Onboarding status is temporarily unavailable".to_string(),
        )
        .into_response(),
        RouteDecision::Render => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
    }
}

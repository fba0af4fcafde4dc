/// Role guard for administrative destinations
///
/// Strictly simpler than the route guard: session check, then role check.
/// It deliberately does NOT consult onboarding status; an admin reaches
/// administrative destinations even while their own onboarding is incomplete.
/// Non-admin accounts are redirected to the standard dashboard, not shown
/// an error notice.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use tendergate_shared::auth::guard::{admin_decision, AdminDecision};
use tendergate_shared::auth::session::authenticate;

use crate::app::AppState;

use super::{DASHBOARD_PATH, LOGIN_PATH};

/// Role-guard middleware layer
pub async fn role_guard(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let session = authenticate(req.headers(), state.jwt_secret()).ok();

    match admin_decision(session.as_ref()) {
        AdminDecision::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
        AdminDecision::RedirectToDashboard => Redirect::to(DASHBOARD_PATH).into_response(),
        AdminDecision::Render => {
            // Unwrap is safe: Render implies an authenticated session.
            if let Some(session) = session {
                req.extensions_mut().insert(session);
            }
            next.run(req).await
        }
    }
}

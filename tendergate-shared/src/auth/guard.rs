/// Guard decision logic
///
/// Pure decisions for the two guards that wrap protected destinations. The
/// middleware in the api crate does the IO (session validation, status
/// fetch) and passes the results in explicitly; guards never read ambient
/// shared state, so a decision is always about one request's own snapshot.
///
/// The two resolution phases are kept separate by construction: the session
/// is resolved first, and the status snapshot is only ever fetched (and
/// passed in) for an authenticated request to a non-onboarding destination.
/// Collapsing them would allow a request to be judged against a snapshot it
/// never fetched.
///
/// Both guards fail closed: any uncertainty withholds the destination.

use crate::onboarding::status::OnboardingStatus;

use super::session::CurrentAccount;

/// Outcome of the route guard for a protected, non-onboarding destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// No valid session: send to the sign-in destination
    RedirectToLogin,

    /// Authenticated but onboarding incomplete: send to onboarding,
    /// whatever destination was requested
    RedirectToOnboarding,

    /// Status snapshot could not be resolved: withhold the destination
    /// (503), never render on a guess
    StatusUnavailable,

    /// Authenticated and onboarding complete: render the destination
    Render,
}

/// Outcome of the role guard for an administrative destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminDecision {
    /// No valid session: send to the sign-in destination
    RedirectToLogin,

    /// Authenticated but not an admin: send to the standard dashboard
    RedirectToDashboard,

    /// Admin account: render the destination
    Render,
}

/// Decides whether a protected destination may render
///
/// # Arguments
///
/// * `session` - the resolved session, or None when unauthenticated
/// * `status` - the snapshot fetched *for this request*: `None` when the
///   fetch failed or was never attempted (fail closed), `Some` otherwise
///
/// The snapshot parameter is only meaningful for an authenticated request;
/// an unauthenticated one is redirected before any status fetch happens.
pub fn route_decision(
    session: Option<&CurrentAccount>,
    status: Option<&OnboardingStatus>,
) -> RouteDecision {
    if session.is_none() {
        return RouteDecision::RedirectToLogin;
    }

    match status {
        None => RouteDecision::StatusUnavailable,
        Some(status) if !status.completed => RouteDecision::RedirectToOnboarding,
        Some(_) => RouteDecision::Render,
    }
}

/// Decides whether an administrative destination may render
///
/// Deliberately does NOT consult onboarding status: an admin reaches
/// administrative destinations even while its own onboarding is incomplete.
pub fn admin_decision(session: Option<&CurrentAccount>) -> AdminDecision {
    match session {
        None => AdminDecision::RedirectToLogin,
        Some(account) if !account.role.is_admin() => AdminDecision::RedirectToDashboard,
        Some(_) => AdminDecision::Render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::AccountRole;
    use crate::onboarding::step::OnboardingStep;
    use uuid::Uuid;

    fn account(role: AccountRole) -> CurrentAccount {
        CurrentAccount {
            account_id: Uuid::new_v4(),
            role,
        }
    }

    fn status(step: OnboardingStep) -> OnboardingStatus {
        OnboardingStatus {
            current_step: step,
            completed: step.is_terminal(),
            email_verified: true,
            document_status: None,
            has_subscription: false,
        }
    }

    #[test]
    fn test_unauthenticated_is_sent_to_login() {
        assert_eq!(route_decision(None, None), RouteDecision::RedirectToLogin);
        // Login redirect wins even if a snapshot were somehow available.
        let s = status(OnboardingStep::Completed);
        assert_eq!(
            route_decision(None, Some(&s)),
            RouteDecision::RedirectToLogin
        );
    }

    #[test]
    fn test_incomplete_onboarding_is_redirected() {
        let a = account(AccountRole::Standard);
        for step in &OnboardingStep::ALL[..4] {
            let s = status(*step);
            assert_eq!(
                route_decision(Some(&a), Some(&s)),
                RouteDecision::RedirectToOnboarding,
                "step {} should redirect",
                step
            );
        }
    }

    #[test]
    fn test_completed_onboarding_renders() {
        let a = account(AccountRole::Standard);
        let s = status(OnboardingStep::Completed);
        assert_eq!(route_decision(Some(&a), Some(&s)), RouteDecision::Render);
    }

    #[test]
    fn test_unresolved_status_fails_closed() {
        let a = account(AccountRole::Standard);
        assert_eq!(
            route_decision(Some(&a), None),
            RouteDecision::StatusUnavailable
        );
    }

    #[test]
    fn test_admin_gate_by_role() {
        assert_eq!(admin_decision(None), AdminDecision::RedirectToLogin);
        assert_eq!(
            admin_decision(Some(&account(AccountRole::Standard))),
            AdminDecision::RedirectToDashboard
        );
        assert_eq!(
            admin_decision(Some(&account(AccountRole::Admin))),
            AdminDecision::Render
        );
    }

    #[test]
    fn test_admin_gate_ignores_onboarding() {
        // The role guard takes no snapshot at all: an admin with incomplete
        // onboarding still renders administrative destinations.
        let a = account(AccountRole::Admin);
        assert_eq!(admin_decision(Some(&a)), AdminDecision::Render);
    }
}

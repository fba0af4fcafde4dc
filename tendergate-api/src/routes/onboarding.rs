/// Onboarding endpoints
///
/// The status fetcher (`GET /onboarding-status`), the step controller
/// (`GET /onboarding`), and the transition endpoint
/// (`POST /onboarding/next-step`). All require a session but none require
/// completed onboarding; this is where completion happens.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Extension, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tendergate_shared::{
    auth::session::CurrentAccount,
    onboarding::{advance_validated, step_precondition_met, OnboardingStatus, OnboardingStep},
};

/// Indicator state for one entry of the step indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorState {
    /// Step already passed
    Complete,

    /// The step the account is on
    Current,

    /// Not reachable yet; complete previous steps first
    Locked,
}

/// One entry in the step indicator
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepIndicator {
    /// Step identity
    pub step: OnboardingStep,

    /// Indicator state
    pub state: IndicatorState,

    /// Hint shown for locked steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

/// The assembled onboarding view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingView {
    /// The step the account is on
    pub current_step: OnboardingStep,

    /// Indicator entries in progression order
    pub steps: Vec<StepIndicator>,

    /// Actions the current step offers
    pub actions: Vec<&'static str>,

    /// Main-application redirect target, present only when completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<&'static str>,

    /// The snapshot the view was assembled from
    pub status: OnboardingStatus,
}

/// Transition request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStepRequest {
    /// The step the client believes it is on
    pub current_step: OnboardingStep,

    /// The step it wants to move to
    pub next_step: OnboardingStep,
}

/// Transition response: acceptance plus the refreshed snapshot
#[derive(Debug, Serialize)]
pub struct NextStepResponse {
    /// Always true (rejections take the error path)
    pub success: bool,

    /// Snapshot re-fetched after persisting
    pub status: OnboardingStatus,
}

/// Assembles the step view from a status snapshot
///
/// Pure: the snapshot is the only input, so the view is decidable in tests
/// without a database. Steps before the current one are complete; later
/// steps are locked. A locked step whose intervening preconditions are not
/// yet satisfied carries the "complete the previous steps first" hint; this
/// gating is advisory only, the transition validator remains the real gate.
pub fn build_view(status: OnboardingStatus) -> OnboardingView {
    let facts = status.facts();

    let steps = OnboardingStep::ALL
        .iter()
        .map(|&step| {
            let state = if step < status.current_step {
                IndicatorState::Complete
            } else if step == status.current_step {
                IndicatorState::Current
            } else {
                IndicatorState::Locked
            };

            // A locked step is within reach once every step between the
            // current one and it can be left.
            let reachable = OnboardingStep::ALL
                .iter()
                .filter(|&&s| s >= status.current_step && s < step)
                .all(|&s| step_precondition_met(s, facts));

            StepIndicator {
                step,
                state,
                hint: (state == IndicatorState::Locked && !reachable)
                    .then_some("Complete the previous steps first"),
            }
        })
        .collect();

    let actions: Vec<&'static str> = match status.current_step {
        OnboardingStep::EmailVerification => vec!["resend_confirmation"],
        OnboardingStep::UploadDocument => {
            if status.document_status.is_some() {
                vec!["upload_document", "continue"]
            } else {
                vec!["upload_document"]
            }
        }
        OnboardingStep::ChoosePlan => vec!["select_plan", "skip"],
        OnboardingStep::Payment => vec!["complete_payment", "skip"],
        OnboardingStep::Completed => vec!["enter_dashboard"],
    };

    let redirect_to = status.completed.then_some("/dashboard");

    OnboardingView {
        current_step: status.current_step,
        steps,
        actions,
        redirect_to,
        status,
    }
}

/// Returns the onboarding status snapshot
///
/// Idempotent and side-effect free. This is the same fetch the route guard
/// performs before rendering protected destinations.
///
/// # Endpoint
///
/// ```text
/// GET /v1/onboarding-status
/// ```
pub async fn get_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<OnboardingStatus>> {
    let status = OnboardingStatus::load(&state.db, current.account_id).await?;
    Ok(Json(status))
}

/// Returns the assembled onboarding step view
///
/// # Endpoint
///
/// ```text
/// GET /v1/onboarding
/// ```
pub async fn get_view(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> ApiResult<Json<OnboardingView>> {
    let status = OnboardingStatus::load(&state.db, current.account_id).await?;
    Ok(Json(build_view(status)))
}

/// Requests a step transition
///
/// The client states its belief (`currentStep`) and its target (`nextStep`).
/// The validator decides against the persisted step and the account facts;
/// acceptance persists and the handler re-fetches the snapshot before
/// answering, so the client never advances its own belief unobserved.
///
/// # Endpoint
///
/// ```text
/// POST /v1/onboarding/next-step
/// Content-Type: application/json
///
/// { "currentStep": "choose_plan", "nextStep": "payment" }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Transition rejected (stale belief, skipped step,
///   unmet precondition, already completed); persisted state is unchanged
pub async fn next_step(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Json(req): Json<NextStepRequest>,
) -> ApiResult<Json<NextStepResponse>> {
    let status = OnboardingStatus::load(&state.db, current.account_id).await?;

    advance_validated(
        &state.db,
        current.account_id,
        req.current_step,
        req.next_step,
        status.facts(),
    )
    .await?;

    // Transition and observation are sequenced: answer with a fresh fetch.
    let status = OnboardingStatus::load(&state.db, current.account_id).await?;

    Ok(Json(NextStepResponse {
        success: true,
        status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tendergate_shared::onboarding::DocumentStatusView;

    fn snapshot(step: OnboardingStep) -> OnboardingStatus {
        OnboardingStatus {
            current_step: step,
            completed: step == OnboardingStep::Completed,
            email_verified: step > OnboardingStep::EmailVerification,
            document_status: None,
            has_subscription: false,
        }
    }

    fn with_document(mut status: OnboardingStatus) -> OnboardingStatus {
        status.document_status = Some(DocumentStatusView {
            document_id: uuid::Uuid::new_v4(),
            file_name: "registration.pdf".to_string(),
            status: tendergate_shared::models::document::DocumentReviewStatus::Pending,
            uploaded_at: chrono::Utc::now(),
        });
        status
    }

    #[test]
    fn test_indicator_states_follow_position() {
        let view = build_view(snapshot(OnboardingStep::ChoosePlan));

        let states: Vec<IndicatorState> = view.steps.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![
                IndicatorState::Complete,
                IndicatorState::Complete,
                IndicatorState::Current,
                IndicatorState::Locked,
                IndicatorState::Locked,
            ]
        );
    }

    #[test]
    fn test_locked_hint_follows_unmet_preconditions() {
        // Unverified email blocks every later step.
        let view = build_view(snapshot(OnboardingStep::EmailVerification));
        assert!(view
            .steps
            .iter()
            .filter(|s| s.state == IndicatorState::Locked)
            .all(|s| s.hint.is_some()));

        // No document yet: everything past upload_document is out of reach.
        let view = build_view(snapshot(OnboardingStep::UploadDocument));
        assert!(view
            .steps
            .iter()
            .filter(|s| s.state == IndicatorState::Locked)
            .all(|s| s.hint.is_some()));

        // Once a document is recorded the later steps are within reach.
        let view = build_view(with_document(snapshot(OnboardingStep::UploadDocument)));
        assert!(view
            .steps
            .iter()
            .filter(|s| s.state == IndicatorState::Locked)
            .all(|s| s.hint.is_none()));

        // Plan and payment are skippable, so nothing past choose_plan needs
        // a hint.
        let view = build_view(snapshot(OnboardingStep::ChoosePlan));
        assert!(view
            .steps
            .iter()
            .filter(|s| s.state == IndicatorState::Locked)
            .all(|s| s.hint.is_none()));
    }

    #[test]
    fn test_first_step_offers_only_resend() {
        let view = build_view(snapshot(OnboardingStep::EmailVerification));
        assert_eq!(view.actions, vec!["resend_confirmation"]);
        assert!(view.redirect_to.is_none());
    }

    #[test]
    fn test_continue_appears_once_document_recorded() {
        let view = build_view(snapshot(OnboardingStep::UploadDocument));
        assert_eq!(view.actions, vec!["upload_document"]);

        let view = build_view(with_document(snapshot(OnboardingStep::UploadDocument)));
        assert_eq!(view.actions, vec!["upload_document", "continue"]);
    }

    #[test]
    fn test_skippable_steps_offer_skip() {
        let view = build_view(snapshot(OnboardingStep::ChoosePlan));
        assert_eq!(view.actions, vec!["select_plan", "skip"]);

        let view = build_view(snapshot(OnboardingStep::Payment));
        assert_eq!(view.actions, vec!["complete_payment", "skip"]);
    }

    #[test]
    fn test_completed_view_carries_redirect() {
        let view = build_view(snapshot(OnboardingStep::Completed));
        assert_eq!(view.actions, vec!["enter_dashboard"]);
        assert_eq!(view.redirect_to, Some("/dashboard"));
        assert!(view.steps.iter().take(4).all(|s| s.state == IndicatorState::Complete));
    }
}

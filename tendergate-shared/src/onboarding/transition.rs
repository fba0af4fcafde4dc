/// Transition validation for the onboarding state machine
///
/// This module is the single authority on whether an account may move from
/// one onboarding step to the next. It is pure decision logic: callers pass
/// the persisted current step, the client's requested `(from, to)` pair, and
/// the latest facts about the account, and get an accept/reject answer.
/// Persistence of accepted transitions happens in
/// [`progress`](super::progress); clients never advance their own belief;
/// they re-fetch the snapshot after every transition call.
///
/// # Rules
///
/// - The terminal `completed` state absorbs: nothing moves out of it.
/// - The client's `currentStep` must match the persisted step; a stale
///   belief is rejected so the client is forced to re-fetch.
/// - `nextStep` must be the immediate successor of `currentStep`. No
///   skipping, no lateral moves, no regressions.
/// - Leaving `email_verification` requires a verified email; leaving
///   `upload_document` requires a submitted document. `choose_plan` and
///   `payment` carry no hard precondition; both may be explicitly skipped,
///   payment can be completed later.

use serde::{Deserialize, Serialize};

use super::step::OnboardingStep;

/// Rejection reasons for a requested transition
///
/// Every variant maps to a recoverable `4xx` on the wire; a rejection never
/// changes persisted state and never ends the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Onboarding already finished; the terminal state absorbs
    #[error("onboarding is already completed")]
    AlreadyCompleted,

    /// The client's belief about the current step is out of date
    #[error("current step is {actual}, not {claimed}; refresh onboarding status")]
    StaleStep {
        claimed: OnboardingStep,
        actual: OnboardingStep,
    },

    /// Requested step is not the immediate successor of the current one
    #[error("cannot move from {from} to {to}: steps must be completed in order")]
    NotNextStep {
        from: OnboardingStep,
        to: OnboardingStep,
    },

    /// Email address has not been confirmed yet
    #[error("email address must be verified before continuing")]
    EmailNotVerified,

    /// No qualifying document has been submitted yet
    #[error("a qualifying document must be uploaded before continuing")]
    DocumentMissing,
}

/// The facts a transition decision depends on
///
/// Gathered from the status snapshot at decision time and passed in
/// explicitly, never read from ambient shared state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StepFacts {
    /// Whether the account's email address has been confirmed
    pub email_verified: bool,

    /// Whether any document has been submitted (review outcome irrelevant)
    pub has_document: bool,
}

/// Decides whether the precondition for *leaving* `step` is satisfied
///
/// Also used by the onboarding controller for step-indicator gating: an
/// earlier step's indicator may be revisited only when its own precondition
/// already holds. Advisory there; [`validate_transition`] remains the real
/// gate.
pub fn step_precondition_met(step: OnboardingStep, facts: StepFacts) -> bool {
    match step {
        OnboardingStep::EmailVerification => facts.email_verified,
        OnboardingStep::UploadDocument => facts.has_document,
        // Plan and payment are explicitly skippable.
        OnboardingStep::ChoosePlan | OnboardingStep::Payment => true,
        OnboardingStep::Completed => true,
    }
}

/// Validates a requested `(from → to)` move against the persisted step and
/// the latest facts
///
/// # Arguments
///
/// * `current` - the persisted step (authoritative)
/// * `claimed_from` - the step the client believes it is on
/// * `requested_to` - the step the client wants to reach
/// * `facts` - latest account facts
///
/// # Errors
///
/// Returns a [`TransitionError`] describing the first rule the request
/// violates; the caller surfaces the message to the account holder verbatim.
pub fn validate_transition(
    current: OnboardingStep,
    claimed_from: OnboardingStep,
    requested_to: OnboardingStep,
    facts: StepFacts,
) -> Result<(), TransitionError> {
    if current.is_terminal() {
        return Err(TransitionError::AlreadyCompleted);
    }

    if claimed_from != current {
        return Err(TransitionError::StaleStep {
            claimed: claimed_from,
            actual: current,
        });
    }

    // Single successor comparison enforces "no skip" in both directions.
    if current.next() != Some(requested_to) {
        return Err(TransitionError::NotNextStep {
            from: claimed_from,
            to: requested_to,
        });
    }

    match current {
        OnboardingStep::EmailVerification if !facts.email_verified => {
            Err(TransitionError::EmailNotVerified)
        }
        OnboardingStep::UploadDocument if !facts.has_document => {
            Err(TransitionError::DocumentMissing)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_facts() -> StepFacts {
        StepFacts {
            email_verified: true,
            has_document: true,
        }
    }

    #[test]
    fn test_accepts_each_in_order_step_with_preconditions_met() {
        for step in &OnboardingStep::ALL[..4] {
            let next = step.next().unwrap();
            assert_eq!(validate_transition(*step, *step, next, all_facts()), Ok(()));
        }
    }

    #[test]
    fn test_rejects_skipping_steps() {
        // email_verification → payment is rejected regardless of facts.
        let err = validate_transition(
            OnboardingStep::EmailVerification,
            OnboardingStep::EmailVerification,
            OnboardingStep::Payment,
            all_facts(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            TransitionError::NotNextStep {
                from: OnboardingStep::EmailVerification,
                to: OnboardingStep::Payment,
            }
        );
    }

    #[test]
    fn test_rejects_regression_and_lateral_moves() {
        let err = validate_transition(
            OnboardingStep::ChoosePlan,
            OnboardingStep::ChoosePlan,
            OnboardingStep::UploadDocument,
            all_facts(),
        )
        .unwrap_err();
        assert!(matches!(err, TransitionError::NotNextStep { .. }));

        let err = validate_transition(
            OnboardingStep::ChoosePlan,
            OnboardingStep::ChoosePlan,
            OnboardingStep::ChoosePlan,
            all_facts(),
        )
        .unwrap_err();
        assert!(matches!(err, TransitionError::NotNextStep { .. }));
    }

    #[test]
    fn test_rejects_unverified_email() {
        let facts = StepFacts {
            email_verified: false,
            has_document: true,
        };

        let err = validate_transition(
            OnboardingStep::EmailVerification,
            OnboardingStep::EmailVerification,
            OnboardingStep::UploadDocument,
            facts,
        )
        .unwrap_err();

        assert_eq!(err, TransitionError::EmailNotVerified);
    }

    #[test]
    fn test_rejects_missing_document() {
        let facts = StepFacts {
            email_verified: true,
            has_document: false,
        };

        let err = validate_transition(
            OnboardingStep::UploadDocument,
            OnboardingStep::UploadDocument,
            OnboardingStep::ChoosePlan,
            facts,
        )
        .unwrap_err();

        assert_eq!(err, TransitionError::DocumentMissing);
    }

    #[test]
    fn test_plan_and_payment_are_skippable() {
        // No subscription, no payment: both forward moves still accepted.
        let facts = StepFacts {
            email_verified: true,
            has_document: true,
        };

        assert_eq!(
            validate_transition(
                OnboardingStep::ChoosePlan,
                OnboardingStep::ChoosePlan,
                OnboardingStep::Payment,
                facts,
            ),
            Ok(())
        );
        assert_eq!(
            validate_transition(
                OnboardingStep::Payment,
                OnboardingStep::Payment,
                OnboardingStep::Completed,
                facts,
            ),
            Ok(())
        );
    }

    #[test]
    fn test_terminal_state_absorbs() {
        let err = validate_transition(
            OnboardingStep::Completed,
            OnboardingStep::Completed,
            OnboardingStep::Completed,
            all_facts(),
        )
        .unwrap_err();

        assert_eq!(err, TransitionError::AlreadyCompleted);
    }

    #[test]
    fn test_rejects_stale_client_belief() {
        // Server already moved on; the client must re-fetch, not re-base.
        let err = validate_transition(
            OnboardingStep::ChoosePlan,
            OnboardingStep::UploadDocument,
            OnboardingStep::ChoosePlan,
            all_facts(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            TransitionError::StaleStep {
                claimed: OnboardingStep::UploadDocument,
                actual: OnboardingStep::ChoosePlan,
            }
        );
    }

    #[test]
    fn test_step_indicator_preconditions() {
        let none = StepFacts::default();
        assert!(!step_precondition_met(
            OnboardingStep::EmailVerification,
            none
        ));
        assert!(!step_precondition_met(OnboardingStep::UploadDocument, none));
        assert!(step_precondition_met(OnboardingStep::ChoosePlan, none));
        assert!(step_precondition_met(OnboardingStep::Payment, none));
    }
}

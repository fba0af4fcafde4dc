/// Onboarding progression state machine
///
/// Everything that decides and records how an account moves through the
/// mandatory activation sequence:
///
/// - `step`: the ordered step enum
/// - `transition`: pure accept/reject decisions (the transition validator)
/// - `progress`: the persisted per-account step and validated advancement
/// - `status`: the server-computed status snapshot (the status fetcher)

pub mod progress;
pub mod status;
pub mod step;
pub mod transition;

pub use progress::{advance_validated, AdvanceError, OnboardingProgress};
pub use status::{DocumentStatusView, OnboardingStatus, StatusError};
pub use step::OnboardingStep;
pub use transition::{step_precondition_met, validate_transition, StepFacts, TransitionError};

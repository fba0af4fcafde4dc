/// Onboarding step ordering
///
/// This module defines the fixed activation sequence every new account walks
/// through before reaching the main application:
///
/// ```text
/// email_verification → upload_document → choose_plan → payment → completed
/// ```
///
/// The ordering is expressed through the enum's declaration order and the
/// derived `Ord` implementation, so "no skipping" is a single successor
/// comparison rather than scattered index arithmetic.
///
/// # Example
///
/// ```
/// use tendergate_shared::onboarding::step::OnboardingStep;
///
/// assert_eq!(
///     OnboardingStep::EmailVerification.next(),
///     Some(OnboardingStep::UploadDocument)
/// );
/// assert!(OnboardingStep::Completed.is_terminal());
/// assert!(OnboardingStep::ChoosePlan < OnboardingStep::Payment);
/// ```

use serde::{Deserialize, Serialize};

/// One named stage in the fixed activation sequence
///
/// Declaration order is the progression order. The derived `Ord` gives the
/// total order used by the transition validator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "onboarding_step", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    /// Account must confirm its email address (out-of-band link)
    EmailVerification,

    /// Account must submit a qualifying document
    UploadDocument,

    /// Account picks a subscription plan (skippable)
    ChoosePlan,

    /// Account completes payment (skippable, can pay later)
    Payment,

    /// Terminal absorbing state: the main application is open
    Completed,
}

impl OnboardingStep {
    /// All steps in progression order
    pub const ALL: [OnboardingStep; 5] = [
        OnboardingStep::EmailVerification,
        OnboardingStep::UploadDocument,
        OnboardingStep::ChoosePlan,
        OnboardingStep::Payment,
        OnboardingStep::Completed,
    ];

    /// Returns the step immediately following this one, or `None` for the
    /// terminal state
    pub fn next(&self) -> Option<OnboardingStep> {
        match self {
            OnboardingStep::EmailVerification => Some(OnboardingStep::UploadDocument),
            OnboardingStep::UploadDocument => Some(OnboardingStep::ChoosePlan),
            OnboardingStep::ChoosePlan => Some(OnboardingStep::Payment),
            OnboardingStep::Payment => Some(OnboardingStep::Completed),
            OnboardingStep::Completed => None,
        }
    }

    /// True for the terminal absorbing state
    pub fn is_terminal(&self) -> bool {
        matches!(self, OnboardingStep::Completed)
    }

    /// Gets the step name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingStep::EmailVerification => "email_verification",
            OnboardingStep::UploadDocument => "upload_document",
            OnboardingStep::ChoosePlan => "choose_plan",
            OnboardingStep::Payment => "payment",
            OnboardingStep::Completed => "completed",
        }
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_is_progression_order() {
        for pair in OnboardingStep::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should precede {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_next_walks_the_whole_sequence() {
        let mut step = OnboardingStep::EmailVerification;
        let mut visited = vec![step];
        while let Some(n) = step.next() {
            visited.push(n);
            step = n;
        }
        assert_eq!(visited, OnboardingStep::ALL);
    }

    #[test]
    fn test_completed_is_terminal() {
        assert!(OnboardingStep::Completed.is_terminal());
        assert_eq!(OnboardingStep::Completed.next(), None);

        for step in &OnboardingStep::ALL[..4] {
            assert!(!step.is_terminal());
        }
    }

    #[test]
    fn test_wire_encoding_is_snake_case() {
        let json = serde_json::to_string(&OnboardingStep::EmailVerification).unwrap();
        assert_eq!(json, "\"email_verification\"");

        let step: OnboardingStep = serde_json::from_str("\"choose_plan\"").unwrap();
        assert_eq!(step, OnboardingStep::ChoosePlan);
    }
}

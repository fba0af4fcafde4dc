//! # Tendergate Shared Library
//!
//! Shared types and business logic for the Tendergate tender-dashboard
//! backend. The api crate consumes everything here; keeping the onboarding
//! state machine and the guard decisions in a library crate keeps them pure
//! and unit-testable away from HTTP.
//!
//! ## Module Organization
//!
//! - `models`: database models (accounts, documents, subscriptions)
//! - `onboarding`: the activation state machine (step ordering, transition
//!   validation, persisted progress, status snapshots)
//! - `auth`: sessions, password hashing, confirmation tokens, guard logic
//! - `db`: connection pool and migration runner
//! - `mail`: confirmation mail delivery seam

pub mod auth;
pub mod db;
pub mod mail;
pub mod models;
pub mod onboarding;

/// Current version of the Tendergate shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

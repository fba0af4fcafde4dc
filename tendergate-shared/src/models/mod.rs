/// Database models for Tendergate
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `account`: registered tenants, credentials, role, profile completeness
/// - `document`: qualifying-document submissions and review outcomes
/// - `subscription`: plan selections backing the `hasSubscription` fact
///
/// The persisted onboarding step lives with the state machine in
/// [`crate::onboarding`].

pub mod account;
pub mod document;
pub mod subscription;

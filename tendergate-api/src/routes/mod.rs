/// API route handlers
///
/// Grouped by concern:
/// - `health`: liveness probe
/// - `auth`: registration, login, logout, email confirmation
/// - `onboarding`: status snapshot, step view, transition requests
/// - `documents`: qualification-document submissions
/// - `plans`: subscription plan selection
/// - `dashboard` / `account`: route-guarded destinations
/// - `admin`: role-guarded destinations

pub mod account;
pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod onboarding;
pub mod plans;

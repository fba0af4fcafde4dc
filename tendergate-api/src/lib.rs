//! # Tendergate API Server
//!
//! HTTP API for the Tendergate tender-dashboard backend: account
//! registration and sessions, the onboarding progression state machine, and
//! the route/role guards that gate protected destinations on it.
//!
//! ## Modules
//!
//! - [`app`]: Application state and router assembly
//! - [`config`]: Environment-driven configuration
//! - [`error`]: Unified API error type
//! - [`middleware`]: Route guard and role guard
//! - [`routes`]: Endpoint handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

//! Typed HTTP client for the intake backend service.
//!
//! This crate is the wizard's only network boundary: every form, case, and
//! evidence operation goes through [`IntakeClient`]. Non-success responses
//! are normalized into [`ApiError`] carrying the HTTP status plus any
//! server-provided detail message.

mod client;
mod error;

pub use client::IntakeClient;
pub use error::ApiError;

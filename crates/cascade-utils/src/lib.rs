//! Foundation utilities shared by every cascade crate.
//!
//! - [`types`] - phase identifiers and the report shapes consumed by the CLI and UI
//! - [`error`] - library error taxonomy with user-facing rendering
//! - [`exit_codes`] - CLI exit code table
//! - [`logging`] - tracing subscriber setup
//! - [`canonicalization`] - JCS (RFC 8785) JSON emission
//! - [`paths`] - the on-disk plan directory layout

pub mod canonicalization;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod paths;
pub mod types;

//! Content validation for plan documents
//!
//! Each phase has a fixed set of required `## ` sections plus structural
//! checks on their contents. All issues are accumulated; nothing
//! short-circuits.

pub mod sections;
mod validator;

pub use validator::{ContentIssue, ContentValidator, ValidationLimits, required_sections};

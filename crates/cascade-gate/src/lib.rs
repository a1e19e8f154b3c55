//! Compliance gate for three-phase plan trees
//!
//! [`ComplianceCheck`] folds the locator, the per-phase content validator and
//! the cross-phase [`consistency`] check into a single
//! [`ComplianceReport`](cascade_utils::types::ComplianceReport).

pub mod command;
pub mod consistency;
pub mod json;
pub mod render;

pub use command::{ComplianceCheck, ComplianceOptions};
pub use consistency::{IssueScope, check_consistency, merge_consistency};
pub use json::emit_report_json;
pub use render::{INCOMPLETE_LABEL, READY_LABEL, exit_code_for, merge_label, render_markdown, render_text};

//! cascade - compliance checks for three-phase planning trees
//!
//! Plans live under `.claude/plans/` in three phase directories: the
//! pre-execution plan, the execution report (`_EXECUTED`) and the
//! verification report (`_VERIFICATION`). cascade locates and correlates
//! those documents, validates their structure and cross-checks them.
//!
//! cascade can be used in two ways:
//! - **CLI**: `cascade check` gates CI, `cascade status` and `cascade watch`
//!   feed editors and terminals
//! - **Library**: call [`check_plans`] or drive the component crates directly
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! let report = cascade::check_plans(".claude/plans");
//! if !report.is_valid {
//!     println!("{}", cascade::render_markdown(&report));
//! }
//! ```
//!
//! # JSON Contracts
//!
//! Reports and summaries are emitted in JCS (RFC 8785) canonical form, see
//! [`emit_jcs`].

use std::path::PathBuf;

pub mod cli;

pub use cascade_config::{CliArgs, Config, ConfigSource, ConsumerPolicy, WatchConfig};
pub use cascade_gate::{
    ComplianceCheck, ComplianceOptions, INCOMPLETE_LABEL, READY_LABEL, check_consistency,
    emit_report_json, exit_code_for, merge_label, render_markdown, render_text,
};
pub use cascade_plans::{
    CompletionStats, Correlator, IdentityAlgorithm, PhaseDocument, PhaseLocator, PlanIdentity,
    PlanTriplet, SortOrder, TimestampFallback,
};
pub use cascade_status::{PlanRow, PlanStatusSummary, StatusManager, StatusWatcher};
pub use cascade_utils::canonicalization::emit_jcs;
pub use cascade_utils::error::{CascadeError, ConfigError};
pub use cascade_utils::exit_codes::ExitCode;
pub use cascade_utils::paths::PlanLayout;
pub use cascade_utils::types::{ComplianceReport, Phase, PhaseStatus, ValidationResult};
pub use cascade_validation::{ContentValidator, ValidationLimits};

/// Run the compliance check on a plans root with default options.
#[must_use]
pub fn check_plans(root: impl Into<PathBuf>) -> ComplianceReport {
    ComplianceCheck::new(PlanLayout::new(root), ComplianceOptions::default()).execute()
}

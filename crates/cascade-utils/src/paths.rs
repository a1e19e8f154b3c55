//! On-disk layout of a plans tree.
//!
//! ```text
//! .claude/plans/
//!   1_pre_exec_plans/<YYYYMMDD_HHMMSS>_<NAME>.md
//!   2_post_exec_plans/<YYYYMMDD_HHMMSS>_<NAME>_EXECUTED.md
//!   3_checked_delta_exec_plans/<YYYYMMDD_HHMMSS>_<NAME>_VERIFICATION.md
//! ```

use std::path::{Path, PathBuf};

use crate::types::Phase;

/// Default plans root, relative to the repository root.
pub const DEFAULT_PLANS_ROOT: &str = ".claude/plans";

/// Environment variable overriding the configured plans root.
pub const PLANS_ROOT_ENV: &str = "CASCADE_PLANS_ROOT";

/// Name of the phase directory under the plans root.
#[must_use]
pub const fn phase_dir_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Plan => "1_pre_exec_plans",
        Phase::Executed => "2_post_exec_plans",
        Phase::Verification => "3_checked_delta_exec_plans",
    }
}

/// Resolved locations of the three phase directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanLayout {
    root: PathBuf,
}

impl PlanLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn phase_dir(&self, phase: Phase) -> PathBuf {
        self.root.join(phase_dir_name(phase))
    }
}

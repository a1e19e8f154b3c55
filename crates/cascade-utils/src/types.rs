use serde::{Deserialize, Serialize};
use std::fmt;

/// The three phases of the planning convention.
///
/// ```text
/// Plan (1_pre_exec_plans) → Executed (2_post_exec_plans) → Verification (3_checked_delta_exec_plans)
/// ```
///
/// # Example
///
/// ```rust
/// use cascade_utils::types::Phase;
///
/// assert_eq!(Phase::Executed.number(), 2);
/// assert_eq!(Phase::Verification.marker(), Some("VERIFICATION"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Phase 1: the pre-execution plan.
    Plan,
    /// Phase 2: the post-execution report, named with an `_EXECUTED` suffix.
    Executed,
    /// Phase 3: the verification report, named with a `_VERIFICATION` suffix.
    Verification,
}

impl Phase {
    /// All phases in pipeline order.
    pub const ALL: [Phase; 3] = [Phase::Plan, Phase::Executed, Phase::Verification];

    /// Ordinal used in user-facing messages ("Phase 2").
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Plan => 1,
            Self::Executed => 2,
            Self::Verification => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Executed => "executed",
            Self::Verification => "verification",
        }
    }

    /// Literal marker a filename must contain to belong to this phase.
    ///
    /// Phase 1 files carry no marker.
    #[must_use]
    pub const fn marker(self) -> Option<&'static str> {
        match self {
            Self::Plan => None,
            Self::Executed => Some("EXECUTED"),
            Self::Verification => Some("VERIFICATION"),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase {}", self.number())
    }
}

/// Outcome of validating one document, or of a cross-phase check.
///
/// Issues are human-readable diagnostics, not structured codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub issues: Vec<String>,
}

impl ValidationResult {
    /// Build a result whose validity is derived from the issue list.
    #[must_use]
    pub fn from_issues(issues: Vec<String>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
        }
    }

    #[must_use]
    pub fn valid() -> Self {
        Self::from_issues(Vec::new())
    }

    /// A failed result carrying a single issue.
    #[must_use]
    pub fn failure(issue: impl Into<String>) -> Self {
        Self::from_issues(vec![issue.into()])
    }
}

/// Per-phase section of a [`ComplianceReport`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseStatus {
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub is_valid: bool,
    pub issues: Vec<String>,
}

impl PhaseStatus {
    /// Status for a file that was found on disk, before validation.
    #[must_use]
    pub fn found(file_path: impl Into<String>) -> Self {
        Self {
            exists: true,
            file_path: Some(file_path.into()),
            is_valid: false,
            issues: Vec::new(),
        }
    }

    /// Record a validation outcome, keeping any issues already attached.
    pub fn apply(&mut self, result: ValidationResult) {
        self.is_valid = result.is_valid && self.issues.is_empty();
        self.issues.extend(result.issues);
    }

    /// Attach an issue; any issue invalidates the phase.
    pub fn push_issue(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
        self.is_valid = false;
    }
}

/// The three per-phase statuses, keyed the way the JSON contract expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStatuses {
    pub phase1: PhaseStatus,
    pub phase2: PhaseStatus,
    pub phase3: PhaseStatus,
}

impl PhaseStatuses {
    #[must_use]
    pub fn get(&self, phase: Phase) -> &PhaseStatus {
        match phase {
            Phase::Plan => &self.phase1,
            Phase::Executed => &self.phase2,
            Phase::Verification => &self.phase3,
        }
    }

    pub fn get_mut(&mut self, phase: Phase) -> &mut PhaseStatus {
        match phase {
            Phase::Plan => &mut self.phase1,
            Phase::Executed => &mut self.phase2,
            Phase::Verification => &mut self.phase3,
        }
    }
}

/// Aggregate compliance verdict for a plans tree.
///
/// This is the sole artifact consumed by report formatters. It is recomputed
/// from scratch on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub is_valid: bool,
    pub phases: PhaseStatuses,
}

impl ComplianceReport {
    /// Recompute the overall verdict from the per-phase statuses.
    pub fn refresh_validity(&mut self) {
        self.is_valid =
            self.phases.phase1.is_valid && self.phases.phase2.is_valid && self.phases.phase3.is_valid;
    }

    /// Total number of issues across all phases.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        Phase::ALL
            .iter()
            .map(|phase| self.phases.get(*phase).issues.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display_uses_ordinal() {
        assert_eq!(Phase::Plan.to_string(), "Phase 1");
        assert_eq!(Phase::Verification.to_string(), "Phase 3");
    }

    #[test]
    fn test_phase_markers() {
        assert_eq!(Phase::Plan.marker(), None);
        assert_eq!(Phase::Executed.marker(), Some("EXECUTED"));
    }

    #[test]
    fn test_phase_status_apply_keeps_prior_issues() {
        let mut status = PhaseStatus::found("a.md");
        status.push_issue("early");
        status.apply(ValidationResult::valid());
        assert!(!status.is_valid);
        assert_eq!(status.issues, vec!["early".to_string()]);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let mut report = ComplianceReport::default();
        report.phases.phase1 = PhaseStatus::found("1_pre_exec_plans/x.md");
        report.phases.phase1.apply(ValidationResult::valid());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["isValid"], false);
        assert_eq!(json["phases"]["phase1"]["filePath"], "1_pre_exec_plans/x.md");
        assert_eq!(json["phases"]["phase1"]["isValid"], true);
        assert!(json["phases"]["phase2"].get("filePath").is_none());
    }

    #[test]
    fn test_refresh_validity_requires_all_phases() {
        let mut report = ComplianceReport::default();
        for phase in Phase::ALL {
            report.phases.get_mut(phase).is_valid = true;
        }
        report.refresh_validity();
        assert!(report.is_valid);

        report.phases.phase3.push_issue("bad");
        report.refresh_validity();
        assert!(!report.is_valid);
        assert_eq!(report.issue_count(), 1);
    }
}

//! Compliance check for a plans tree
//!
//! Evaluates the most recent document of each phase, gating each phase on
//! the previous one being present, and cross-checks the three documents
//! when all of them exist.

use cascade_plans::{IdentityAlgorithm, PhaseDocument, PhaseLocator, SortOrder};
use cascade_utils::error::CascadeError;
use cascade_utils::logging::compliance_span;
use cascade_utils::paths::PlanLayout;
use cascade_utils::types::{ComplianceReport, Phase, PhaseStatus};
use cascade_validation::{ContentValidator, ValidationLimits};
use std::io;
use tracing::{debug, info, warn};

use crate::consistency::{check_consistency, merge_consistency};

/// Knobs for a compliance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceOptions {
    pub identity: IdentityAlgorithm,
    pub order: SortOrder,
    pub limits: ValidationLimits,
}

impl Default for ComplianceOptions {
    fn default() -> Self {
        Self {
            identity: IdentityAlgorithm::Regex,
            order: SortOrder::Filename,
            limits: ValidationLimits::default(),
        }
    }
}

/// Compliance check over one plans tree.
///
/// Examines only the newest document of each phase; other plans in the
/// tree do not affect the verdict.
pub struct ComplianceCheck {
    layout: PlanLayout,
    options: ComplianceOptions,
}

impl ComplianceCheck {
    pub fn new(layout: PlanLayout, options: ComplianceOptions) -> Self {
        Self { layout, options }
    }

    /// Run the check. Never fails: internal errors become a phase 1 issue.
    pub fn execute(&self) -> ComplianceReport {
        let root = self.layout.root().display().to_string();
        let _span = compliance_span("check", &root).entered();

        let report = match self.evaluate() {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "Compliance check failed");
                let mut report = ComplianceReport::default();
                report
                    .phases
                    .phase1
                    .push_issue(format!("Compliance check failed: {e}"));
                report
            }
        };

        info!(
            valid = report.is_valid,
            issues = report.issue_count(),
            "Compliance check finished"
        );
        report
    }

    fn evaluate(&self) -> Result<ComplianceReport, CascadeError> {
        let root = self.layout.root();
        if root.exists() && !root.is_dir() {
            return Err(CascadeError::Layout {
                path: root.to_path_buf(),
                reason: "plans root is not a directory".to_string(),
            });
        }

        let locator = PhaseLocator::new(self.options.identity, self.options.order);
        let validator = ContentValidator::new(self.options.limits);
        let mut report = ComplianceReport::default();

        let Some(plan) = self.most_recent(&locator, Phase::Plan)? else {
            report.phases.phase1.push_issue(format!(
                "No Phase 1 plan found in {}",
                self.layout.phase_dir(Phase::Plan).display()
            ));
            return Ok(report);
        };
        self.record(&mut report, &validator, &plan);

        let Some(executed) = self.most_recent(&locator, Phase::Executed)? else {
            report.phases.phase2.push_issue(format!(
                "No Phase 2 execution report found in {}",
                self.layout.phase_dir(Phase::Executed).display()
            ));
            report.refresh_validity();
            return Ok(report);
        };
        self.record(&mut report, &validator, &executed);

        let Some(verification) = self.most_recent(&locator, Phase::Verification)? else {
            report.phases.phase3.push_issue(format!(
                "No Phase 3 verification report found in {}",
                self.layout.phase_dir(Phase::Verification).display()
            ));
            report.refresh_validity();
            return Ok(report);
        };
        self.record(&mut report, &validator, &verification);

        let consistency =
            check_consistency(&plan, &executed, &verification, self.options.identity);
        debug!(
            consistent = consistency.is_valid,
            issues = consistency.issues.len(),
            "Cross-phase consistency checked"
        );
        merge_consistency(&mut report, consistency);

        Ok(report)
    }

    /// Newest document of a phase.
    ///
    /// A phase directory that exists but cannot be listed is an error here;
    /// the locator alone would report it as empty.
    fn most_recent(
        &self,
        locator: &PhaseLocator,
        phase: Phase,
    ) -> Result<Option<PhaseDocument>, CascadeError> {
        let dir = self.layout.phase_dir(phase);
        match std::fs::read_dir(&dir) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(CascadeError::Io { path: dir, source }),
        }
        Ok(locator.most_recent(&self.layout, phase))
    }

    fn record(
        &self,
        report: &mut ComplianceReport,
        validator: &ContentValidator,
        document: &PhaseDocument,
    ) {
        let mut status = PhaseStatus::found(document.path.as_str());
        status.apply(validator.validate(document));
        debug!(
            phase = document.phase.as_str(),
            file = %document.filename,
            valid = status.is_valid,
            "Validated phase document"
        );
        *report.phases.get_mut(document.phase) = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(layout: &PlanLayout, phase: Phase, name: &str, content: &str) {
        let dir = layout.phase_dir(phase);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    fn check(root: &Path) -> ComplianceReport {
        ComplianceCheck::new(PlanLayout::new(root), ComplianceOptions::default()).execute()
    }

    #[test]
    fn test_empty_tree_reports_missing_phase1_only() {
        let temp = TempDir::new().unwrap();
        let report = check(temp.path());

        assert!(!report.is_valid);
        assert!(!report.phases.phase1.exists);
        assert_eq!(report.phases.phase1.issues.len(), 1);
        assert!(report.phases.phase1.issues[0].starts_with("No Phase 1 plan found"));
        assert_eq!(report.phases.phase2, PhaseStatus::default());
        assert_eq!(report.phases.phase3, PhaseStatus::default());
    }

    #[test]
    fn test_unlistable_phase_dir_fails_the_check() {
        let temp = TempDir::new().unwrap();
        let layout = PlanLayout::new(temp.path());
        write(&layout, Phase::Plan, "20250101_120000_FOO.md", "# plan\n");
        // A file where the phase 2 directory should be
        fs::write(layout.phase_dir(Phase::Executed), "not a directory").unwrap();

        let report = check(temp.path());
        assert!(!report.is_valid);
        assert_eq!(report.phases.phase1.issues.len(), 1);
        assert!(
            report.phases.phase1.issues[0].starts_with("Compliance check failed: IO error at"),
            "{:?}",
            report.phases.phase1.issues
        );
        assert!(report.phases.phase1.issues[0].contains("2_post_exec_plans"));
        assert_eq!(report.phases.phase2, PhaseStatus::default());
    }

    #[test]
    fn test_phase3_not_examined_without_phase2() {
        let temp = TempDir::new().unwrap();
        let layout = PlanLayout::new(temp.path());
        write(&layout, Phase::Plan, "20250101_120000_FOO.md", "# short\n");
        write(
            &layout,
            Phase::Verification,
            "20250101_120000_FOO_VERIFICATION.md",
            "# verification\n",
        );

        let report = check(temp.path());
        assert!(report.phases.phase1.exists);
        assert!(!report.phases.phase2.exists);
        assert!(report.phases.phase2.issues[0].starts_with("No Phase 2 execution report"));
        assert_eq!(report.phases.phase3, PhaseStatus::default());
    }

    #[test]
    fn test_newest_plan_is_the_one_checked() {
        let temp = TempDir::new().unwrap();
        let layout = PlanLayout::new(temp.path());
        write(&layout, Phase::Plan, "20250101_120000_OLD.md", "# old\n");
        write(&layout, Phase::Plan, "20250301_120000_NEW.md", "# new\n");

        let report = check(temp.path());
        let path = report.phases.phase1.file_path.unwrap();
        assert!(path.ends_with("20250301_120000_NEW.md"));
    }

    #[test]
    fn test_root_that_is_a_file_becomes_phase1_issue() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("plans");
        fs::write(&root, "not a directory").unwrap();

        let report = check(&root);
        assert!(!report.is_valid);
        assert_eq!(report.phases.phase1.issues.len(), 1);
        assert!(report.phases.phase1.issues[0].starts_with("Compliance check failed"));
    }
}

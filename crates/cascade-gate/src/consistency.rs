//! Cross-phase consistency between the three documents of one triplet.
//!
//! Issues are plain strings. [`IssueScope::of`] routes them back to a phase
//! by the ordinal they lead with: "Phase 2" to phase 2, "Phase 3" to phase 3,
//! anything else to all three phases. Plan names and file names quoted later
//! in an issue never affect routing.

use cascade_plans::{IdentityAlgorithm, PhaseDocument};
use cascade_utils::types::{ComplianceReport, Phase, ValidationResult};
use cascade_validation::sections::{count_bullets, extract_section};
use tracing::debug;

const PLAN_CRITERIA: &str = "Success Criteria";
const ASSESSMENT: &str = "Success Criteria Assessment";

/// Which phase(s) an issue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueScope {
    Phase(Phase),
    All,
}

impl IssueScope {
    #[must_use]
    pub fn of(issue: &str) -> Self {
        if issue.starts_with("Phase 2") {
            Self::Phase(Phase::Executed)
        } else if issue.starts_with("Phase 3") {
            Self::Phase(Phase::Verification)
        } else {
            Self::All
        }
    }
}

/// Compare the documents of one triplet.
///
/// All three files must exist; otherwise a single issue naming the missing
/// files is returned and nothing else is checked.
#[must_use]
pub fn check_consistency(
    phase1: &PhaseDocument,
    phase2: &PhaseDocument,
    phase3: &PhaseDocument,
    identity: IdentityAlgorithm,
) -> ValidationResult {
    let missing: Vec<&str> = [phase1, phase2, phase3]
        .into_iter()
        .filter(|document| !document.exists())
        .map(|document| document.filename.as_str())
        .collect();
    if !missing.is_empty() {
        return ValidationResult::failure(format!(
            "Cross-phase consistency not checked; missing file(s): {}",
            missing.join(", ")
        ));
    }

    let mut issues = Vec::new();

    let plan_name = identity.extract(&phase1.filename);
    for document in [phase2, phase3] {
        let name = identity.extract(&document.filename);
        if name != plan_name {
            issues.push(format!(
                "{} plan name '{name}' does not match Phase 1 plan name '{plan_name}'",
                document.phase
            ));
        }
    }

    let (plan_text, verification_text) = match (phase1.read_content(), phase3.read_content()) {
        (Ok(plan), Ok(verification)) => (plan, verification),
        (Err(e), _) | (_, Err(e)) => {
            issues.push(format!(
                "Cross-phase consistency not checked; failed to read documents: {e}"
            ));
            return ValidationResult::from_issues(issues);
        }
    };

    let expected = extract_section(&plan_text, PLAN_CRITERIA).map_or(0, |s| count_bullets(&s));
    let assessed =
        extract_section(&verification_text, ASSESSMENT).map_or(0, |s| count_bullets(&s));
    debug!(expected, assessed, "Compared success criteria coverage");

    if assessed < expected {
        issues.push(format!(
            "Phase 3 assessed {assessed} points but Phase 1 defined {expected} points in {PLAN_CRITERIA}"
        ));
    }

    ValidationResult::from_issues(issues)
}

/// Attach consistency issues to the phases they concern, invalidating them.
pub fn merge_consistency(report: &mut ComplianceReport, result: ValidationResult) {
    for issue in result.issues {
        match IssueScope::of(&issue) {
            IssueScope::Phase(phase) => report.phases.get_mut(phase).push_issue(issue),
            IssueScope::All => {
                for phase in Phase::ALL {
                    report.phases.get_mut(phase).push_issue(issue.clone());
                }
            }
        }
    }
    report.refresh_validity();
}

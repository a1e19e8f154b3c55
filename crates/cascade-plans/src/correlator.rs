//! Plan triplet correlation.
//!
//! A phase-2 candidate belongs to a phase-1 plan when its identity equals the
//! plan's identity and its filename contains `EXECUTED`; phase 3 likewise with
//! `VERIFICATION`. Both sides of every comparison go through the
//! correlator's own [`IdentityAlgorithm`], whatever algorithm the locator
//! used, so algorithm A output is never compared against algorithm B output.

use cascade_utils::types::Phase;
use serde::Serialize;
use tracing::{debug, warn};

use crate::locator::PhaseDocument;
use crate::naming::{IdentityAlgorithm, PlanIdentity, divergence};

/// One logical plan and whatever phase-2/phase-3 documents were found for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTriplet {
    pub identity: PlanIdentity,
    pub phase1: PhaseDocument,
    pub phase2: Option<PhaseDocument>,
    pub phase3: Option<PhaseDocument>,
}

impl PlanTriplet {
    #[must_use]
    pub fn has_phase2(&self) -> bool {
        self.phase2.is_some()
    }

    #[must_use]
    pub fn has_phase3(&self) -> bool {
        self.phase3.is_some()
    }

    /// Complete iff both follow-up documents exist.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.has_phase2() && self.has_phase3()
    }
}

/// Completion counts over a set of phase-1 plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats {
    pub total: usize,
    pub completed: usize,
    pub rate: u8,
}

impl CompletionStats {
    /// `round(100 * completed / total)`, or `empty_rate` when there are no plans.
    ///
    /// The empty case is call-site policy: the editor status bar treats an
    /// empty tree as fully compliant (100) while the CI consumer reports 0.
    #[must_use]
    pub fn from_triplets(triplets: &[PlanTriplet], empty_rate: u8) -> Self {
        let total = triplets.len();
        let completed = triplets.iter().filter(|t| t.is_complete()).count();
        Self {
            total,
            completed,
            rate: completion_rate(completed, total, empty_rate),
        }
    }
}

/// Percentage of completed plans, rounded half up.
#[must_use]
pub fn completion_rate(completed: usize, total: usize, empty_rate: u8) -> u8 {
    if total == 0 {
        return empty_rate.min(100);
    }
    let completed = completed.min(total);
    // Integer form of round(100 * completed / total) for non-negative values.
    ((200 * completed + total) / (2 * total)) as u8
}

/// Matches phase-1 plans with their follow-up documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Correlator {
    identity: IdentityAlgorithm,
}

impl Correlator {
    #[must_use]
    pub fn new(identity: IdentityAlgorithm) -> Self {
        Self { identity }
    }

    /// Identity of a document under this correlator's algorithm.
    fn identity_of(&self, document: &PhaseDocument) -> PlanIdentity {
        if let Some(found) = divergence(&document.filename) {
            warn!(
                filename = %document.filename,
                regex = %found.regex,
                split = %found.split,
                using = self.identity.as_str(),
                "Identity algorithms disagree for plan filename"
            );
        }
        self.identity.extract(&document.filename)
    }

    fn find_match(
        &self,
        identity: &PlanIdentity,
        candidates: &[PhaseDocument],
        phase: Phase,
    ) -> Option<PhaseDocument> {
        let marker = phase.marker()?;
        candidates
            .iter()
            .find(|candidate| {
                candidate.filename.contains(marker)
                    && self.identity.extract(&candidate.filename) == *identity
            })
            .cloned()
    }

    /// Correlate one phase-1 plan against the candidate lists.
    ///
    /// Candidates are expected newest first; the first match wins.
    pub fn correlate(
        &self,
        plan: &PhaseDocument,
        executed: &[PhaseDocument],
        verifications: &[PhaseDocument],
    ) -> PlanTriplet {
        let identity = self.identity_of(plan);
        let phase2 = self.find_match(&identity, executed, Phase::Executed);
        let phase3 = self.find_match(&identity, verifications, Phase::Verification);

        debug!(
            identity = %identity,
            has_phase2 = phase2.is_some(),
            has_phase3 = phase3.is_some(),
            "Correlated plan"
        );

        PlanTriplet {
            identity,
            phase1: plan.clone(),
            phase2,
            phase3,
        }
    }

    /// Correlate every phase-1 plan, preserving the input order.
    pub fn correlate_all(
        &self,
        plans: &[PhaseDocument],
        executed: &[PhaseDocument],
        verifications: &[PhaseDocument],
    ) -> Vec<PlanTriplet> {
        for candidate in executed.iter().chain(verifications) {
            self.identity_of(candidate);
        }
        plans
            .iter()
            .map(|plan| self.correlate(plan, executed, verifications))
            .collect()
    }
}

/// The newest incomplete plan by filename, used for UI hints only.
#[must_use]
pub fn active_plan(triplets: &[PlanTriplet]) -> Option<&PlanTriplet> {
    triplets
        .iter()
        .filter(|triplet| !triplet.is_complete())
        .max_by(|a, b| a.phase1.filename.cmp(&b.phase1.filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn doc(filename: &str, phase: Phase) -> PhaseDocument {
        PhaseDocument {
            path: Utf8PathBuf::from(format!("/plans/{filename}")),
            filename: filename.to_string(),
            phase,
            identity: IdentityAlgorithm::Regex.extract(filename),
            timestamp: None,
            modified: None,
        }
    }

    #[test]
    fn test_full_triplet_is_complete() {
        let plan = doc("20250101_120000_FOO.md", Phase::Plan);
        let executed = vec![doc("20250101_120000_FOO_EXECUTED.md", Phase::Executed)];
        let verified = vec![doc("20250101_120000_FOO_VERIFICATION.md", Phase::Verification)];

        let triplet = Correlator::default().correlate(&plan, &executed, &verified);
        assert_eq!(triplet.identity.as_str(), "FOO");
        assert!(triplet.has_phase2());
        assert!(triplet.has_phase3());
        assert!(triplet.is_complete());
    }

    #[test]
    fn test_identity_must_match_exactly() {
        let plan = doc("20250101_120000_FOO.md", Phase::Plan);
        let executed = vec![doc("20250101_120000_FOOBAR_EXECUTED.md", Phase::Executed)];

        let triplet = Correlator::default().correlate(&plan, &executed, &[]);
        assert!(!triplet.has_phase2());
        assert!(!triplet.is_complete());
    }

    #[test]
    fn test_marker_required_even_when_identity_matches() {
        let plan = doc("20250101_120000_FOO.md", Phase::Plan);
        // Same identity, but no EXECUTED marker in the filename.
        let executed = vec![doc("20250102_090000_FOO.md", Phase::Executed)];

        let triplet = Correlator::default().correlate(&plan, &executed, &[]);
        assert!(!triplet.has_phase2());
    }

    #[test]
    fn test_timestamps_may_differ_across_phases() {
        let plan = doc("20250101_120000_FOO.md", Phase::Plan);
        let executed = vec![doc("20250105_170000_FOO_EXECUTED.md", Phase::Executed)];

        let triplet = Correlator::default().correlate(&plan, &executed, &[]);
        assert!(triplet.has_phase2());
    }

    #[test]
    fn test_algorithm_choice_changes_match_for_untimestamped_report() {
        let plan = doc("20250101_120000_FOO.md", Phase::Plan);
        // Split drops "LEGACY" and "NOTES" as if they were date and time.
        let executed = vec![doc("LEGACY_NOTES_FOO_EXECUTED.md", Phase::Executed)];

        let regex = Correlator::new(IdentityAlgorithm::Regex).correlate(&plan, &executed, &[]);
        assert!(!regex.has_phase2());

        let split = Correlator::new(IdentityAlgorithm::Split).correlate(&plan, &executed, &[]);
        assert!(split.has_phase2());
    }

    #[test]
    fn test_completion_rate_rounds_half_up() {
        assert_eq!(completion_rate(1, 3, 0), 33);
        assert_eq!(completion_rate(2, 3, 0), 67);
        assert_eq!(completion_rate(1, 8, 0), 13);
        assert_eq!(completion_rate(3, 3, 0), 100);
    }

    #[test]
    fn test_completion_rate_empty_is_call_site_policy() {
        assert_eq!(completion_rate(0, 0, 100), 100);
        assert_eq!(completion_rate(0, 0, 0), 0);
    }

    #[test]
    fn test_stats_from_triplets() {
        let correlator = Correlator::default();
        let plans = vec![
            doc("20250102_120000_BAR.md", Phase::Plan),
            doc("20250101_120000_FOO.md", Phase::Plan),
        ];
        let executed = vec![
            doc("20250102_120000_BAR_EXECUTED.md", Phase::Executed),
            doc("20250101_120000_FOO_EXECUTED.md", Phase::Executed),
        ];
        let verified = vec![doc("20250101_120000_FOO_VERIFICATION.md", Phase::Verification)];

        let triplets = correlator.correlate_all(&plans, &executed, &verified);
        let stats = CompletionStats::from_triplets(&triplets, 100);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.rate, 50);

        let active = active_plan(&triplets).unwrap();
        assert_eq!(active.identity.as_str(), "BAR");
    }

    #[test]
    fn test_active_plan_picks_newest_incomplete() {
        let correlator = Correlator::default();
        let plans = vec![
            doc("20250101_120000_OLD.md", Phase::Plan),
            doc("20250301_120000_NEW.md", Phase::Plan),
            doc("20250201_120000_MID.md", Phase::Plan),
        ];
        let triplets = correlator.correlate_all(&plans, &[], &[]);
        assert_eq!(active_plan(&triplets).unwrap().identity.as_str(), "NEW");
    }

    #[test]
    fn test_no_active_plan_when_all_complete() {
        let plan = doc("20250101_120000_FOO.md", Phase::Plan);
        let executed = vec![doc("20250101_120000_FOO_EXECUTED.md", Phase::Executed)];
        let verified = vec![doc("20250101_120000_FOO_VERIFICATION.md", Phase::Verification)];
        let triplets = Correlator::default().correlate_all(&[plan], &executed, &verified);
        assert!(active_plan(&triplets).is_none());
    }
}

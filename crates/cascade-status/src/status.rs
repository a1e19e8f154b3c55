//! Status summary generation.
//!
//! Unlike the compliance check, which looks at the newest document of each
//! phase, the summary correlates every phase 1 plan in the tree.

use anyhow::Result;
use cascade_config::ConsumerPolicy;
use cascade_plans::correlator::active_plan;
use cascade_plans::{CompletionStats, Correlator, IdentityAlgorithm, PhaseLocator, PlanTriplet};
use cascade_utils::canonicalization::emit_jcs;
use cascade_utils::error::CascadeError;
use cascade_utils::paths::PlanLayout;
use cascade_utils::types::Phase;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Write;
use tracing::debug;

/// One phase 1 plan and its follow-up documents.
///
/// Equality ignores `timestamp`: a parsed timestamp is already implied by
/// `phase1_path`, and the fallback for untimestamped names changes on
/// every summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRow {
    pub identity: String,
    pub phase1_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase2_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase3_path: Option<String>,
    pub complete: bool,
    #[serde(skip)]
    pub timestamp: Option<NaiveDateTime>,
}

impl PartialEq for PlanRow {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && self.phase1_path == other.phase1_path
            && self.phase2_path == other.phase2_path
            && self.phase3_path == other.phase3_path
            && self.complete == other.complete
    }
}

impl Eq for PlanRow {}

impl From<&PlanTriplet> for PlanRow {
    fn from(triplet: &PlanTriplet) -> Self {
        Self {
            identity: triplet.identity.to_string(),
            phase1_path: triplet.phase1.path.to_string(),
            phase2_path: triplet.phase2.as_ref().map(|d| d.path.to_string()),
            phase3_path: triplet.phase3.as_ref().map(|d| d.path.to_string()),
            complete: triplet.is_complete(),
            timestamp: triplet.phase1.timestamp,
        }
    }
}

/// Completion summary of a plans tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStatusSummary {
    pub completion_rate: u8,
    pub total_plans: usize,
    pub completed_plans: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_plan: Option<String>,
    pub plans: Vec<PlanRow>,
}

impl PlanStatusSummary {
    /// One-line rendering for a status bar.
    #[must_use]
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "Plans: {}% complete ({}/{})",
            self.completion_rate, self.completed_plans, self.total_plans
        );
        if let Some(active) = &self.active_plan {
            let _ = write!(line, " | active: {active}");
        }
        line
    }

    /// Multi-line rendering for the terminal.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = self.status_line();
        out.push('\n');
        for row in &self.plans {
            let phase = |present: bool| if present { "✓" } else { "·" };
            let _ = write!(
                out,
                "\n  {} {} {} {}",
                phase(true),
                phase(row.phase2_path.is_some()),
                phase(row.phase3_path.is_some()),
                row.identity
            );
            if let Some(timestamp) = row.timestamp {
                let _ = write!(out, "  ({})", timestamp.format("%Y-%m-%d %H:%M"));
            }
        }
        if !self.plans.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Canonical JSON (JCS) for tooling.
    pub fn to_json(&self) -> Result<String> {
        emit_jcs(self).map_err(|e| CascadeError::render("status JSON", &e).into())
    }
}

/// Builds [`PlanStatusSummary`] values for one plans tree.
#[derive(Debug, Clone)]
pub struct StatusManager {
    layout: PlanLayout,
    identity: IdentityAlgorithm,
    policy: ConsumerPolicy,
}

impl StatusManager {
    #[must_use]
    pub fn new(layout: PlanLayout, identity: IdentityAlgorithm, policy: ConsumerPolicy) -> Self {
        Self {
            layout,
            identity,
            policy,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &PlanLayout {
        &self.layout
    }

    /// Correlate every plan in the tree. Read-only and never fails.
    #[must_use]
    pub fn summarize(&self) -> PlanStatusSummary {
        let locator = PhaseLocator::new(self.identity, self.policy.order)
            .with_timestamp_fallback(self.policy.timestamp_fallback);
        let plans = locator.locate_phase(&self.layout, Phase::Plan);
        let executed = locator.locate_phase(&self.layout, Phase::Executed);
        let verifications = locator.locate_phase(&self.layout, Phase::Verification);

        let triplets = Correlator::new(self.identity).correlate_all(&plans, &executed, &verifications);
        let stats = CompletionStats::from_triplets(&triplets, self.policy.empty_rate);
        debug!(
            total = stats.total,
            completed = stats.completed,
            rate = stats.rate,
            "Summarized plan status"
        );

        PlanStatusSummary {
            completion_rate: stats.rate,
            total_plans: stats.total,
            completed_plans: stats.completed,
            active_plan: active_plan(&triplets).map(|t| t.identity.to_string()),
            plans: triplets.iter().map(PlanRow::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(layout: &PlanLayout, phase: Phase, name: &str) {
        let dir = layout.phase_dir(phase);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), "# doc\n").unwrap();
    }

    fn manager(temp: &TempDir, policy: ConsumerPolicy) -> StatusManager {
        StatusManager::new(PlanLayout::new(temp.path()), IdentityAlgorithm::Regex, policy)
    }

    #[test]
    fn test_empty_tree_rate_depends_on_policy() {
        let temp = TempDir::new().unwrap();
        assert_eq!(manager(&temp, ConsumerPolicy::STATUS).summarize().completion_rate, 100);
        assert_eq!(manager(&temp, ConsumerPolicy::CHECK).summarize().completion_rate, 0);
    }

    #[test]
    fn test_summary_counts_and_active_plan() {
        let temp = TempDir::new().unwrap();
        let layout = PlanLayout::new(temp.path());
        write(&layout, Phase::Plan, "20250101_120000_FOO.md");
        write(&layout, Phase::Plan, "20250102_120000_BAR.md");
        write(&layout, Phase::Plan, "20250103_120000_BAZ.md");
        write(&layout, Phase::Executed, "20250101_130000_FOO_EXECUTED.md");
        write(&layout, Phase::Verification, "20250101_140000_FOO_VERIFICATION.md");
        write(&layout, Phase::Executed, "20250102_130000_BAR_EXECUTED.md");

        let summary = manager(&temp, ConsumerPolicy::CHECK).summarize();
        assert_eq!(summary.total_plans, 3);
        assert_eq!(summary.completed_plans, 1);
        assert_eq!(summary.completion_rate, 33);
        assert_eq!(summary.active_plan.as_deref(), Some("BAZ"));
        assert_eq!(summary.plans[0].identity, "BAZ");
        assert!(summary.status_line().contains("33% complete (1/3)"));
    }

    #[test]
    fn test_summary_json_shape() {
        let temp = TempDir::new().unwrap();
        let layout = PlanLayout::new(temp.path());
        write(&layout, Phase::Plan, "20250101_120000_FOO.md");

        let summary = manager(&temp, ConsumerPolicy::CHECK).summarize();
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["completionRate"], 0);
        assert_eq!(json["totalPlans"], 1);
        assert_eq!(json["activePlan"], "FOO");
        assert_eq!(json["plans"][0]["complete"], false);
        assert!(json["plans"][0].get("phase2Path").is_none());
        assert!(json["plans"][0].get("timestamp").is_none());
    }

    #[test]
    fn test_untimestamped_plan_summarizes_identically() {
        let temp = TempDir::new().unwrap();
        let layout = PlanLayout::new(temp.path());
        write(&layout, Phase::Plan, "NOTES.md");

        let manager = manager(&temp, ConsumerPolicy::STATUS);
        let first = manager.summarize();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = manager.summarize();

        assert!(first.plans[0].timestamp.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_text_marks_phases() {
        let temp = TempDir::new().unwrap();
        let layout = PlanLayout::new(temp.path());
        write(&layout, Phase::Plan, "20250101_120000_FOO.md");
        write(&layout, Phase::Executed, "20250101_130000_FOO_EXECUTED.md");

        let text = manager(&temp, ConsumerPolicy::CHECK).summarize().render_text();
        assert!(text.contains("  ✓ ✓ · FOO  (2025-01-01 12:00)"));
    }
}

//! Human and pull-request renderings of a compliance report.

use cascade_utils::exit_codes::ExitCode;
use cascade_utils::types::{ComplianceReport, Phase, PhaseStatus};
use std::fmt::Write;

/// Label applied to a pull request whose plans tree is compliant.
pub const READY_LABEL: &str = "cascade:ready-to-merge";

/// Label applied to a pull request whose plans tree is not.
pub const INCOMPLETE_LABEL: &str = "cascade:incomplete";

#[must_use]
pub fn merge_label(report: &ComplianceReport) -> &'static str {
    if report.is_valid {
        READY_LABEL
    } else {
        INCOMPLETE_LABEL
    }
}

/// Process exit code for a finished check.
#[must_use]
pub fn exit_code_for(report: &ComplianceReport) -> ExitCode {
    if report.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::NON_COMPLIANT
    }
}

fn phase_title(phase: Phase) -> &'static str {
    match phase {
        Phase::Plan => "Pre-execution plan",
        Phase::Executed => "Execution report",
        Phase::Verification => "Verification report",
    }
}

fn status_word(status: &PhaseStatus) -> &'static str {
    match (status.exists, status.is_valid) {
        (true, true) => "valid",
        (true, false) => "invalid",
        (false, _) if status.issues.is_empty() => "not checked",
        (false, _) => "missing",
    }
}

/// Terminal output for `cascade check`.
#[must_use]
pub fn render_text(report: &ComplianceReport) -> String {
    let mut out = String::new();
    if report.is_valid {
        let _ = writeln!(out, "✓ Three-phase plan is compliant");
    } else {
        let _ = writeln!(
            out,
            "✗ Three-phase plan is not compliant ({} issue(s))",
            report.issue_count()
        );
    }

    for phase in Phase::ALL {
        let status = report.phases.get(phase);
        let mark = if status.is_valid { "✓" } else { "✗" };
        let _ = writeln!(out);
        let _ = writeln!(out, "  {mark} {phase}: {} ({})", phase_title(phase), status_word(status));
        if let Some(path) = &status.file_path {
            let _ = writeln!(out, "      File: {path}");
        }
        for issue in &status.issues {
            let _ = writeln!(out, "      - {issue}");
        }
    }
    out
}

/// Markdown body for a pull-request comment.
#[must_use]
pub fn render_markdown(report: &ComplianceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## Three-Phase Planning Compliance");
    let _ = writeln!(out);
    if report.is_valid {
        let _ = writeln!(out, "✅ **All phases complete and consistent.**");
    } else {
        let _ = writeln!(
            out,
            "❌ **Plan is incomplete:** {} issue(s) must be resolved before merging.",
            report.issue_count()
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "| Phase | Document | Status |");
    let _ = writeln!(out, "|-------|----------|--------|");
    for phase in Phase::ALL {
        let status = report.phases.get(phase);
        let document = status
            .file_path
            .as_deref()
            .map_or_else(|| "_none_".to_string(), |path| format!("`{path}`"));
        let _ = writeln!(
            out,
            "| {phase}: {} | {document} | {} |",
            phase_title(phase),
            status_word(status)
        );
    }

    if !report.is_valid {
        let _ = writeln!(out);
        let _ = writeln!(out, "### Issues");
        for phase in Phase::ALL {
            let status = report.phases.get(phase);
            if status.issues.is_empty() {
                continue;
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "**{phase}**");
            for issue in &status.issues {
                let _ = writeln!(out, "- {issue}");
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Label: `{}`", merge_label(report));
    out
}

use cascade_plans::PhaseDocument;
use cascade_utils::types::{Phase, ValidationResult};
use std::fmt;
use tracing::debug;

use crate::sections::{
    extract_section, has_bullets, has_measurable_metric, has_numbered_steps, missing_sections,
};

const OBJECTIVE: &str = "Objective";
const DETAILED_STEPS: &str = "Detailed Steps";
const SUCCESS_CRITERIA: &str = "Success Criteria";
const WHAT_WAS_EXECUTED: &str = "What Was Executed";
const RESULTS_ACHIEVED: &str = "Results Achieved";
const DEVIATIONS: &str = "Deviations from Plan";
const TESTS_PERFORMED: &str = "Verification Tests Performed";
const CRITERIA_ASSESSMENT: &str = "Success Criteria Assessment";
const FINAL_STATUS: &str = "Final Status";

const FINAL_VERDICTS: [&str; 4] = ["PASS", "FAIL", "COMPLETE", "INCOMPLETE"];

/// Required `## ` headings per phase.
#[must_use]
pub fn required_sections(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::Plan => &[OBJECTIVE, DETAILED_STEPS, SUCCESS_CRITERIA],
        Phase::Executed => &[WHAT_WAS_EXECUTED, RESULTS_ACHIEVED, DEVIATIONS],
        Phase::Verification => &[TESTS_PERFORMED, CRITERIA_ASSESSMENT, FINAL_STATUS],
    }
}

/// Minimum document sizes, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub plan_min_chars: usize,
    pub executed_min_chars: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            plan_min_chars: 500,
            executed_min_chars: 300,
        }
    }
}

impl ValidationLimits {
    fn min_chars(&self, phase: Phase) -> Option<usize> {
        match phase {
            Phase::Plan => Some(self.plan_min_chars),
            Phase::Executed => Some(self.executed_min_chars),
            Phase::Verification => None,
        }
    }
}

/// A single structural problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentIssue {
    /// The file could not be read
    Unreadable { path: String, reason: String },
    /// One or more required headings are absent
    MissingSections { sections: Vec<String> },
    /// The document is shorter than the phase minimum
    TooShort { actual: usize, minimum: usize },
    /// No `1. step` lines anywhere in a plan
    NoNumberedSteps,
    /// A section lacks a measurable quantity
    NoMeasurableMetric { section: &'static str },
    /// A section lacks `-`/`*` bullet items
    NoBulletItems { section: &'static str },
    /// A section has neither numbered steps nor bullet items
    NoListItems { section: &'static str },
    /// A verification section lacks the expected markers
    MissingMarker {
        section: &'static str,
        alternatives: &'static [&'static str],
    },
    /// The final status names no verdict token
    NoFinalVerdict,
}

impl fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { path, reason } => write!(f, "Failed to read {path}: {reason}"),
            Self::MissingSections { sections } => {
                write!(f, "Missing required sections: {}", sections.join(", "))
            }
            Self::TooShort { actual, minimum } => write!(
                f,
                "Content too short: {actual} characters (minimum: {minimum} characters)"
            ),
            Self::NoNumberedSteps => {
                write!(f, "No numbered steps found (expected lines like '1. Do something')")
            }
            Self::NoMeasurableMetric { section } => write!(
                f,
                "{section} section has no measurable metrics (e.g. '95%', '200 ms', '10/10')"
            ),
            Self::NoBulletItems { section } => {
                write!(f, "{section} section has no bullet list items")
            }
            Self::NoListItems { section } => write!(
                f,
                "{section} section lists no numbered steps or bullet items"
            ),
            Self::MissingMarker {
                section,
                alternatives,
            } => {
                let quoted: Vec<String> = alternatives.iter().map(|m| format!("'{m}'")).collect();
                write!(f, "{section} section contains none of {}", quoted.join(" or "))
            }
            Self::NoFinalVerdict => write!(
                f,
                "{FINAL_STATUS} section has no verdict (expected one of {})",
                FINAL_VERDICTS.join(", ")
            ),
        }
    }
}

impl std::error::Error for ContentIssue {}

/// Validates the text of a single phase document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentValidator {
    limits: ValidationLimits,
}

impl ContentValidator {
    #[must_use]
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// Read and validate a located document.
    ///
    /// The file is re-read on every call. A read failure yields a single
    /// issue rather than an error.
    pub fn validate(&self, document: &PhaseDocument) -> ValidationResult {
        match document.read_content() {
            Ok(content) => self.validate_content(&content, document.phase),
            Err(e) => {
                debug!(path = %document.path, error = %e, "Phase document unreadable");
                ValidationResult::failure(
                    ContentIssue::Unreadable {
                        path: document.path.to_string(),
                        reason: e.to_string(),
                    }
                    .to_string(),
                )
            }
        }
    }

    /// Validate already-loaded content as the given phase.
    #[must_use]
    pub fn validate_content(&self, content: &str, phase: Phase) -> ValidationResult {
        let issues = self.check(content, phase);
        ValidationResult::from_issues(issues.iter().map(ToString::to_string).collect())
    }

    /// All issues for the content, in check order.
    #[must_use]
    pub fn check(&self, content: &str, phase: Phase) -> Vec<ContentIssue> {
        let mut issues = Vec::new();

        let missing = missing_sections(content, required_sections(phase));
        if !missing.is_empty() {
            issues.push(ContentIssue::MissingSections {
                sections: missing.into_iter().map(str::to_string).collect(),
            });
        }

        if let Some(minimum) = self.limits.min_chars(phase) {
            let actual = content.chars().count();
            if actual < minimum {
                issues.push(ContentIssue::TooShort { actual, minimum });
            }
        }

        match phase {
            Phase::Plan => check_plan(content, &mut issues),
            Phase::Executed => check_executed(content, &mut issues),
            Phase::Verification => check_verification(content, &mut issues),
        }

        debug!(phase = phase.as_str(), issues = issues.len(), "Validated content");
        issues
    }
}

// Section-level checks only run when the section body could be extracted;
// an absent heading is already reported as a missing section.

fn check_plan(content: &str, issues: &mut Vec<ContentIssue>) {
    if !has_numbered_steps(content) {
        issues.push(ContentIssue::NoNumberedSteps);
    }

    if let Some(criteria) = extract_section(content, SUCCESS_CRITERIA) {
        if !has_measurable_metric(&criteria) {
            issues.push(ContentIssue::NoMeasurableMetric {
                section: SUCCESS_CRITERIA,
            });
        }
        if !has_bullets(&criteria) {
            issues.push(ContentIssue::NoBulletItems {
                section: SUCCESS_CRITERIA,
            });
        }
    }
}

fn check_executed(content: &str, issues: &mut Vec<ContentIssue>) {
    for section in [WHAT_WAS_EXECUTED, RESULTS_ACHIEVED] {
        if let Some(body) = extract_section(content, section)
            && !has_numbered_steps(&body)
            && !has_bullets(&body)
        {
            issues.push(ContentIssue::NoListItems { section });
        }
    }
}

fn check_verification(content: &str, issues: &mut Vec<ContentIssue>) {
    if let Some(tests) = extract_section(content, TESTS_PERFORMED) {
        const ACTIONS: &[&str] = &["Command/Action:", "Test:"];
        const RESULTS: &[&str] = &["Expected Result:", "Actual Result:"];
        for alternatives in [ACTIONS, RESULTS] {
            if !alternatives.iter().any(|marker| tests.contains(marker)) {
                issues.push(ContentIssue::MissingMarker {
                    section: TESTS_PERFORMED,
                    alternatives,
                });
            }
        }
    }

    if let Some(assessment) = extract_section(content, CRITERIA_ASSESSMENT)
        && !has_measurable_metric(&assessment)
    {
        issues.push(ContentIssue::NoMeasurableMetric {
            section: CRITERIA_ASSESSMENT,
        });
    }

    if let Some(status) = extract_section(content, FINAL_STATUS)
        && !FINAL_VERDICTS.iter().any(|token| status.contains(token))
    {
        issues.push(ContentIssue::NoFinalVerdict);
    }
}

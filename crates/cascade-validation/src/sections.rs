//! Markdown section helpers shared by the validators and the consistency check.
//!
//! Presence and extraction deliberately differ: [`has_section`] is an exact,
//! case-sensitive substring test for `## <Name>`, while [`extract_section`]
//! matches the heading case-insensitively. A document headed
//! `## success criteria` is therefore reported missing yet still has its
//! body extracted and checked.

use regex::Regex;
use std::sync::LazyLock;

static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[-*]\s+.+").expect("valid bullet regex"));

static NUMBERED_STEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s+.+").expect("valid numbered step regex"));

static MEASURABLE_METRIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+%|\d+\s*(seconds|minutes|hours|ms|tests|users)|\d+/\d+")
        .expect("valid metric regex")
});

static NEXT_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*##\s+").expect("valid heading regex"));

/// Exact-case presence test for a `## <name>` heading.
#[must_use]
pub fn has_section(content: &str, name: &str) -> bool {
    content.contains(&format!("## {name}"))
}

/// Required section names whose heading is absent, in the given order.
#[must_use]
pub fn missing_sections<'a>(content: &str, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|name| !has_section(content, name))
        .collect()
}

/// Body of the first `## <name>` section, matched case-insensitively.
///
/// The body runs from the whitespace after the heading up to the next `##`
/// marker (a `### ` sub-heading also ends it, one `#` in) or the end of the
/// document, and is trimmed. Returns `None` when the heading is absent or the
/// body is empty.
#[must_use]
pub fn extract_section(content: &str, name: &str) -> Option<String> {
    let heading = Regex::new(&format!(r"(?i)## {}\s+", regex::escape(name))).ok()?;
    let found = heading.find(content)?;
    let body = &content[found.end()..];

    let document_end = body.trim_end().len();
    let end = NEXT_HEADING
        .find(body)
        .map_or(document_end, |m| m.start().min(document_end));

    let section = body[..end].trim();
    (!section.is_empty()).then(|| section.to_string())
}

/// Number of `-`/`*` bullet lines.
#[must_use]
pub fn count_bullets(text: &str) -> usize {
    BULLET_ITEM.find_iter(text).count()
}

#[must_use]
pub fn has_bullets(text: &str) -> bool {
    BULLET_ITEM.is_match(text)
}

#[must_use]
pub fn has_numbered_steps(text: &str) -> bool {
    NUMBERED_STEP.is_match(text)
}

/// Whether the text mentions a measurable quantity: a percentage, a count of
/// time units/tests/users, or a ratio.
#[must_use]
pub fn has_measurable_metric(text: &str) -> bool {
    MEASURABLE_METRIC.is_match(text)
}

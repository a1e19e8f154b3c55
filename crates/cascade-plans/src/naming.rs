//! Filename convention parsing: `YYYYMMDD_HHMMSS_PLAN_NAME[_SUFFIX].md`.
//!
//! Two identity algorithms exist because two independently evolved consumers
//! derive plan identities differently:
//!
//! - [`IdentityAlgorithm::Regex`] captures everything after the timestamp on
//!   the extension-less stem, then strips an exact-case phase suffix. Names
//!   without a timestamp fall back to the filename minus `.md`.
//! - [`IdentityAlgorithm::Split`] drops the first two `_`-separated segments
//!   unconditionally and strips the phase suffix and `.md` with a single
//!   case-insensitive replace.
//!
//! They agree on every conventional filename and disagree on lowercase
//! suffixes and on names without a timestamp prefix. [`divergence`] reports
//! such cases so callers can log them; neither output is preferred.

use chrono::{Local, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static TIMESTAMP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}_\d{6}_").expect("valid timestamp regex"));

static REGEX_IDENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}_\d{6}_(.+?)$").expect("valid identity regex"));

static SPLIT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(_EXECUTED|_VERIFICATION)?\.md$").expect("valid suffix regex")
});

const PHASE_SUFFIXES: [&str; 2] = ["_EXECUTED", "_VERIFICATION"];

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Normalized key associating documents of the same plan across phases.
///
/// Best-effort string matching, not a guaranteed unique key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanIdentity(String);

impl PlanIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which identity extraction a consumer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityAlgorithm {
    /// Timestamp-capture regex with exact-case suffix stripping.
    #[default]
    Regex,
    /// Split on `_`, drop two segments, case-insensitive suffix replace.
    Split,
}

impl IdentityAlgorithm {
    /// Extract the plan identity from a bare filename (no directory part).
    #[must_use]
    pub fn extract(self, filename: &str) -> PlanIdentity {
        match self {
            Self::Regex => regex_identity(filename),
            Self::Split => split_identity(filename),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regex => "regex",
            Self::Split => "split",
        }
    }
}

impl std::str::FromStr for IdentityAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "regex" => Ok(Self::Regex),
            "split" => Ok(Self::Split),
            other => Err(format!(
                "unknown identity algorithm '{other}' (expected 'regex' or 'split')"
            )),
        }
    }
}

/// What to report when a filename carries no timestamp prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFallback {
    /// Treat the document as created now.
    Now,
    /// Leave the timestamp empty.
    #[default]
    Empty,
}

/// The two algorithms' outputs for a filename they disagree on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameDivergence {
    pub regex: PlanIdentity,
    pub split: PlanIdentity,
}

fn strip_md(filename: &str) -> &str {
    filename.strip_suffix(".md").unwrap_or(filename)
}

fn regex_identity(filename: &str) -> PlanIdentity {
    let stem = filename
        .rsplit_once('.')
        .map_or(filename, |(stem, _extension)| stem);

    let Some(captures) = REGEX_IDENTITY.captures(stem) else {
        return PlanIdentity::new(strip_md(filename));
    };

    let name = &captures[1];
    let name = PHASE_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name);
    PlanIdentity::new(name)
}

fn split_identity(filename: &str) -> PlanIdentity {
    let rest = filename.split('_').skip(2).collect::<Vec<_>>().join("_");
    PlanIdentity::new(SPLIT_SUFFIX.replace(&rest, ""))
}

/// Whether the filename starts with the `YYYYMMDD_HHMMSS_` prefix.
#[must_use]
pub fn has_timestamp_prefix(filename: &str) -> bool {
    TIMESTAMP_PREFIX.is_match(filename)
}

/// Parse the timestamp prefix, if present and a real calendar date/time.
#[must_use]
pub fn parse_timestamp(filename: &str) -> Option<NaiveDateTime> {
    if !has_timestamp_prefix(filename) {
        return None;
    }
    NaiveDateTime::parse_from_str(&filename[..15], TIMESTAMP_FORMAT).ok()
}

/// Parse the timestamp, applying the call site's fallback when it is absent.
#[must_use]
pub fn timestamp_or(filename: &str, fallback: TimestampFallback) -> Option<NaiveDateTime> {
    parse_timestamp(filename).or_else(|| match fallback {
        TimestampFallback::Now => Some(Local::now().naive_local()),
        TimestampFallback::Empty => None,
    })
}

/// Compare both identity algorithms on one filename.
///
/// Returns `None` when they agree.
#[must_use]
pub fn divergence(filename: &str) -> Option<NameDivergence> {
    let regex = IdentityAlgorithm::Regex.extract(filename);
    let split = IdentityAlgorithm::Split.extract(filename);
    (regex != split).then_some(NameDivergence { regex, split })
}

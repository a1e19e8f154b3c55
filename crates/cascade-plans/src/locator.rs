//! Phase directory scanning.
//!
//! The locator is read-only and never fails: a missing or unreadable
//! directory yields an empty list.

use camino::Utf8PathBuf;
use cascade_utils::paths::PlanLayout;
use cascade_utils::types::Phase;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};

use crate::naming::{IdentityAlgorithm, PlanIdentity, TimestampFallback, timestamp_or};

/// Prefix of template files, which are never plans.
pub const TEMPLATE_PREFIX: &str = "TEMPLATE";

/// Ordering strategy for located documents. Both put the newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Lexicographic descending on filename; the timestamp prefix makes this
    /// most-recent-first.
    #[default]
    Filename,
    /// Filesystem modification time descending.
    Modified,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filename => "filename",
            Self::Modified => "modified",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "filename" => Ok(Self::Filename),
            "modified" | "mtime" => Ok(Self::Modified),
            other => Err(format!(
                "unknown sort order '{other}' (expected 'filename' or 'modified')"
            )),
        }
    }
}

/// One plan document on disk.
///
/// Content is not cached; [`read_content`](Self::read_content) hits the
/// filesystem every time so each validation pass sees the current text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseDocument {
    pub path: Utf8PathBuf,
    pub filename: String,
    pub phase: Phase,
    pub identity: PlanIdentity,
    pub timestamp: Option<NaiveDateTime>,
    pub modified: Option<SystemTime>,
}

impl PhaseDocument {
    pub fn read_content(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Whether a filename is a candidate plan document for the given filter.
#[must_use]
pub fn is_candidate(filename: &str, suffix_filter: Option<&str>) -> bool {
    filename.ends_with(".md")
        && !filename.starts_with(TEMPLATE_PREFIX)
        && suffix_filter.is_none_or(|marker| filename.contains(marker))
}

/// Scans phase directories with a fixed identity algorithm and ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseLocator {
    pub identity: IdentityAlgorithm,
    pub order: SortOrder,
    pub timestamp_fallback: TimestampFallback,
}

impl PhaseLocator {
    #[must_use]
    pub fn new(identity: IdentityAlgorithm, order: SortOrder) -> Self {
        Self {
            identity,
            order,
            timestamp_fallback: TimestampFallback::default(),
        }
    }

    #[must_use]
    pub fn with_timestamp_fallback(mut self, fallback: TimestampFallback) -> Self {
        self.timestamp_fallback = fallback;
        self
    }

    /// List candidate documents in `dir`, newest first.
    pub fn locate(&self, dir: &Path, phase: Phase, suffix_filter: Option<&str>) -> Vec<PhaseDocument> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "Phase directory does not exist");
                return Vec::new();
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Failed to read phase directory");
                return Vec::new();
            }
        };

        let mut documents = Vec::new();
        for entry in entries.flatten() {
            let Ok(filename) = entry.file_name().into_string() else {
                debug!(path = %entry.path().display(), "Skipping non UTF-8 filename");
                continue;
            };
            if !is_candidate(&filename, suffix_filter) {
                continue;
            }
            let metadata = match entry.metadata() {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => {
                    debug!(filename = %filename, "Skipping non-file entry");
                    continue;
                }
                Err(e) => {
                    debug!(filename = %filename, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.path()) else {
                debug!(filename = %filename, "Skipping non UTF-8 path");
                continue;
            };

            documents.push(PhaseDocument {
                path,
                identity: self.identity.extract(&filename),
                timestamp: timestamp_or(&filename, self.timestamp_fallback),
                modified: metadata.modified().ok(),
                filename,
                phase,
            });
        }

        self.sort(&mut documents);
        debug!(
            dir = %dir.display(),
            phase = phase.as_str(),
            count = documents.len(),
            "Located phase documents"
        );
        documents
    }

    /// List a phase directory of the layout, filtered by the phase marker.
    pub fn locate_phase(&self, layout: &PlanLayout, phase: Phase) -> Vec<PhaseDocument> {
        self.locate(&layout.phase_dir(phase), phase, phase.marker())
    }

    /// The newest document of a phase, if any.
    pub fn most_recent(&self, layout: &PlanLayout, phase: Phase) -> Option<PhaseDocument> {
        self.locate_phase(layout, phase).into_iter().next()
    }

    fn sort(&self, documents: &mut [PhaseDocument]) {
        match self.order {
            SortOrder::Filename => documents.sort_by(|a, b| b.filename.cmp(&a.filename)),
            // Unknown mtimes sort last; filename breaks ties for a stable order.
            SortOrder::Modified => documents.sort_by(|a, b| {
                b.modified
                    .cmp(&a.modified)
                    .then_with(|| b.filename.cmp(&a.filename))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "# plan\n").unwrap();
    }

    fn names(documents: &[PhaseDocument]) -> Vec<&str> {
        documents.iter().map(|d| d.filename.as_str()).collect()
    }

    #[test]
    fn test_missing_directory_yields_empty_list() {
        let temp = TempDir::new().unwrap();
        let docs = PhaseLocator::default().locate(&temp.path().join("nope"), Phase::Plan, None);
        assert!(docs.is_empty());
    }

    #[test]
    fn test_filters_extension_template_and_marker() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "20250101_120000_FOO_EXECUTED.md");
        touch(temp.path(), "20250101_120000_BAR.md");
        touch(temp.path(), "20250101_120000_FOO_EXECUTED.txt");
        touch(temp.path(), "TEMPLATE_EXECUTED.md");
        fs::create_dir(temp.path().join("20250101_120000_DIR_EXECUTED.md")).unwrap();

        let docs = PhaseLocator::default().locate(temp.path(), Phase::Executed, Some("EXECUTED"));
        assert_eq!(names(&docs), vec!["20250101_120000_FOO_EXECUTED.md"]);
        assert_eq!(docs[0].identity.as_str(), "FOO");
        assert_eq!(docs[0].phase, Phase::Executed);
    }

    #[test]
    fn test_template_excluded_without_filter() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "TEMPLATE_PLAN.md");
        touch(temp.path(), "TEMPLATE.md");
        assert!(PhaseLocator::default().locate(temp.path(), Phase::Plan, None).is_empty());
    }

    #[test]
    fn test_filename_order_is_newest_first() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "20250101_120000_OLD.md");
        touch(temp.path(), "20250301_080000_NEW.md");
        touch(temp.path(), "20250201_120000_MID.md");

        let docs = PhaseLocator::default().locate(temp.path(), Phase::Plan, None);
        assert_eq!(
            names(&docs),
            vec![
                "20250301_080000_NEW.md",
                "20250201_120000_MID.md",
                "20250101_120000_OLD.md"
            ]
        );
    }

    #[test]
    fn test_modified_order_uses_mtime() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "20250301_080000_NEWER_NAME.md");
        touch(temp.path(), "20250101_120000_OLDER_NAME.md");

        let base = SystemTime::now() - Duration::from_secs(3600);
        let set_mtime = |name: &str, at: SystemTime| {
            let file = fs::File::options()
                .write(true)
                .open(temp.path().join(name))
                .unwrap();
            file.set_modified(at).unwrap();
        };
        set_mtime("20250301_080000_NEWER_NAME.md", base);
        set_mtime("20250101_120000_OLDER_NAME.md", base + Duration::from_secs(60));

        let locator = PhaseLocator::new(IdentityAlgorithm::Regex, SortOrder::Modified);
        let docs = locator.locate(temp.path(), Phase::Plan, None);
        assert_eq!(
            names(&docs),
            vec!["20250101_120000_OLDER_NAME.md", "20250301_080000_NEWER_NAME.md"]
        );
    }

    #[test]
    fn test_most_recent_uses_phase_marker() {
        let temp = TempDir::new().unwrap();
        let layout = PlanLayout::new(temp.path());
        let dir = layout.phase_dir(Phase::Verification);
        fs::create_dir_all(&dir).unwrap();
        touch(&dir, "20250101_120000_FOO_VERIFICATION.md");
        touch(&dir, "20250201_120000_NOTES.md");

        let doc = PhaseLocator::default()
            .most_recent(&layout, Phase::Verification)
            .unwrap();
        assert_eq!(doc.filename, "20250101_120000_FOO_VERIFICATION.md");
        assert!(doc.exists());
        assert_eq!(doc.read_content().unwrap(), "# plan\n");
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("modified".parse::<SortOrder>(), Ok(SortOrder::Modified));
        assert_eq!("Filename".parse::<SortOrder>(), Ok(SortOrder::Filename));
        assert!("random".parse::<SortOrder>().is_err());
    }
}

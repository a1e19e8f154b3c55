//! Change detection for the three phase directories.
//!
//! A fingerprint hashes every entry's name, size and modification time, so
//! creating, deleting, renaming or rewriting a plan changes it. Content is not
//! read.

use cascade_utils::paths::PlanLayout;
use cascade_utils::types::Phase;
use std::time::UNIX_EPOCH;

/// BLAKE3 digest over the phase directories' listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeFingerprint([u8; 32]);

impl TreeFingerprint {
    /// Fingerprint the tree. Missing directories hash as empty.
    #[must_use]
    pub fn of(layout: &PlanLayout) -> Self {
        let mut hasher = blake3::Hasher::new();

        for phase in Phase::ALL {
            hasher.update(&[phase.number()]);

            let Ok(entries) = std::fs::read_dir(layout.phase_dir(phase)) else {
                continue;
            };
            let mut listing: Vec<(Vec<u8>, u64, u128)> = entries
                .flatten()
                .map(|entry| {
                    let name = entry.file_name().as_encoded_bytes().to_vec();
                    let (len, modified) = entry.metadata().map_or((0, 0), |meta| {
                        let modified = meta
                            .modified()
                            .ok()
                            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                            .map_or(0, |d| d.as_nanos());
                        (meta.len(), modified)
                    });
                    (name, len, modified)
                })
                .collect();
            listing.sort();

            for (name, len, modified) in listing {
                hasher.update(&(name.len() as u64).to_le_bytes());
                hasher.update(&name);
                hasher.update(&len.to_le_bytes());
                hasher.update(&modified.to_le_bytes());
            }
        }

        Self(*hasher.finalize().as_bytes())
    }

    /// First 8 hex characters, for logs.
    #[must_use]
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

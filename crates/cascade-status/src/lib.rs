//! Plan completion status for editor and terminal consumers.
//!
//! # Modules
//!
//! - [`status`] - Per-plan completion summary over the whole plans tree
//! - [`fingerprint`] - Cheap change detection for the phase directories
//! - [`watch`] - Debounced, latest-wins recomputation loop

pub mod fingerprint;
pub mod status;
pub mod watch;

pub use fingerprint::TreeFingerprint;
pub use status::{PlanRow, PlanStatusSummary, StatusManager};
pub use watch::StatusWatcher;

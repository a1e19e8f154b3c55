//! Plan discovery for the three-phase planning convention.
//!
//! Data flows one way: [`naming`] turns filenames into identities,
//! [`locator`] lists the documents of one phase directory, and
//! [`correlator`] groups a phase-1 plan with its phase-2 and phase-3
//! counterparts.

pub mod correlator;
pub mod locator;
pub mod naming;

pub use correlator::{CompletionStats, Correlator, PlanTriplet};
pub use locator::{PhaseDocument, PhaseLocator, SortOrder};
pub use naming::{IdentityAlgorithm, NameDivergence, PlanIdentity, TimestampFallback};

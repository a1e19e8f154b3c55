//! Command-line interface for cascade
//!
//! ## Module Structure
//!
//! - `args`: CLI argument definitions (clap)
//! - `run`: Main entry point and command dispatch
//! - `commands`: Command implementations

pub mod args;
mod commands;
mod run;

pub use args::{Cli, Commands, build_cli};
pub use run::run;

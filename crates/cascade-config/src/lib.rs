//! Configuration management for cascade
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > environment > file > defaults. Configuration files are TOML with
//! `[plans]`, `[status]`, `[check]`, `[validation]` and `[watch]` tables.

mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use cli_args::CliArgs;
pub use model::{Config, ConfigSource, ConsumerPolicy, WatchConfig};

use cascade_utils::paths::PlanLayout;

/// Name of the per-repository configuration directory.
pub const CONFIG_DIR_NAME: &str = ".cascade";

/// Name of the configuration file inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

impl Config {
    /// Directory layout under the effective plans root.
    #[must_use]
    pub fn layout(&self) -> PlanLayout {
        PlanLayout::new(&self.plans_root)
    }
}

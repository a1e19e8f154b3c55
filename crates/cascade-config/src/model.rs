use cascade_plans::{IdentityAlgorithm, SortOrder, TimestampFallback};
use cascade_utils::paths::DEFAULT_PLANS_ROOT;
use cascade_validation::ValidationLimits;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where an effective configuration value came from.
///
/// Precedence, highest first: CLI, environment, config file, built-in default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Cli,
    Env,
    Config,
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cli => "cli",
            Self::Env => "env",
            Self::Config => "config",
            Self::Default => "default",
        })
    }
}

/// `[plans]` table.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlansTable {
    pub root: Option<String>,
    pub identity: Option<String>,
}

/// `[status]` and `[check]` tables.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConsumerTable {
    pub order: Option<String>,
    pub empty_rate: Option<u32>,
}

/// `[validation]` table.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ValidationTable {
    pub plan_min_chars: Option<usize>,
    pub executed_min_chars: Option<usize>,
}

/// `[watch]` table.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct WatchTable {
    pub interval_secs: Option<u64>,
    pub debounce_ms: Option<u64>,
}

/// TOML configuration file structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlConfig {
    pub plans: Option<PlansTable>,
    pub status: Option<ConsumerTable>,
    pub check: Option<ConsumerTable>,
    pub validation: Option<ValidationTable>,
    pub watch: Option<WatchTable>,
}

/// Ordering and empty-tree policy of one consumer of the plans tree.
///
/// The editor status bar and the CI check read the same tree with different
/// policies; neither is more correct than the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerPolicy {
    pub order: SortOrder,
    /// Completion rate reported when there are no phase 1 plans.
    pub empty_rate: u8,
    /// Timestamp used for documents without a timestamp prefix. Not
    /// configurable.
    pub timestamp_fallback: TimestampFallback,
}

impl ConsumerPolicy {
    /// Status bar: newest by mtime, an empty tree is fully compliant.
    pub const STATUS: Self = Self {
        order: SortOrder::Modified,
        empty_rate: 100,
        timestamp_fallback: TimestampFallback::Now,
    };

    /// CI check: newest by filename, an empty tree is 0 % compliant.
    pub const CHECK: Self = Self {
        order: SortOrder::Filename,
        empty_rate: 0,
        timestamp_fallback: TimestampFallback::Empty,
    };
}

/// Polling behaviour of `cascade watch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    pub interval: Duration,
    pub debounce: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            debounce: Duration::from_millis(250),
        }
    }
}

/// Effective configuration after discovery and precedence resolution.
#[derive(Debug, Clone)]
pub struct Config {
    pub plans_root: PathBuf,
    pub identity: IdentityAlgorithm,
    pub status: ConsumerPolicy,
    pub check: ConsumerPolicy,
    pub validation: ValidationLimits,
    pub watch: WatchConfig,
    /// Config file that was loaded, if any.
    pub config_file: Option<PathBuf>,
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plans_root: PathBuf::from(DEFAULT_PLANS_ROOT),
            identity: IdentityAlgorithm::Regex,
            status: ConsumerPolicy::STATUS,
            check: ConsumerPolicy::CHECK,
            validation: ValidationLimits::default(),
            watch: WatchConfig::default(),
            config_file: None,
            source_attribution: HashMap::new(),
        }
    }
}

use cascade_plans::{IdentityAlgorithm, SortOrder};
use cascade_utils::error::ConfigError;
use cascade_utils::paths::PLANS_ROOT_ENV;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::model::{Config, ConfigSource, ConsumerPolicy, ConsumerTable, TomlConfig};
use crate::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, CliArgs};

const ATTRIBUTED_KEYS: [&str; 10] = [
    "plans.root",
    "plans.identity",
    "status.order",
    "status.empty_rate",
    "check.order",
    "check.empty_rate",
    "validation.plan_min_chars",
    "validation.executed_min_chars",
    "watch.interval_secs",
    "watch.debounce_ms",
];

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

fn parse_identity(key: &str, value: &str) -> Result<IdentityAlgorithm, ConfigError> {
    value.parse().map_err(|e: String| invalid(key, e))
}

fn parse_order(key: &str, value: &str) -> Result<SortOrder, ConfigError> {
    value.parse().map_err(|e: String| invalid(key, e))
}

fn parse_rate(key: &str, value: u32) -> Result<u8, ConfigError> {
    u8::try_from(value)
        .ok()
        .filter(|rate| *rate <= 100)
        .ok_or_else(|| invalid(key, format!("{value} is not a percentage between 0 and 100")))
}

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|e| ConfigError::DiscoveryFailed {
            reason: format!("cannot determine current directory: {e}"),
        })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self {
            source_attribution: ATTRIBUTED_KEYS
                .iter()
                .map(|key| ((*key).to_string(), ConfigSource::Default))
                .collect::<HashMap<_, _>>(),
            ..Self::default()
        };

        let config_path = match &cli_args.config_path {
            Some(explicit) if !explicit.is_file() => {
                return Err(ConfigError::NotFound {
                    path: explicit.display().to_string(),
                });
            }
            Some(explicit) => Some(explicit.clone()),
            None => Self::discover_config_file_from(start_dir).or_else(Self::user_config_file),
        };

        if let Some(path) = &config_path {
            debug!(path = %path.display(), "Loading configuration file");
            let file_config = Self::load_config_file(path)?;
            config.apply_file(file_config)?;
            config.config_file = Some(path.clone());
        }

        // Environment overrides the file
        if let Some(root) = std::env::var_os(PLANS_ROOT_ENV).filter(|v| !v.is_empty()) {
            config.plans_root = PathBuf::from(root);
            config.attribute("plans.root", ConfigSource::Env);
        }

        // CLI overrides everything
        if let Some(root) = &cli_args.plans_root {
            config.plans_root = root.clone();
            config.attribute("plans.root", ConfigSource::Cli);
        }
        if let Some(identity) = &cli_args.identity {
            config.identity = parse_identity("plans.identity", identity)?;
            config.attribute("plans.identity", ConfigSource::Cli);
        }
        if let Some(interval) = cli_args.watch_interval_secs {
            config.watch.interval = Duration::from_secs(interval);
            config.attribute("watch.interval_secs", ConfigSource::Cli);
        }

        config.validate()?;
        Ok(config)
    }

    fn attribute(&mut self, key: &str, source: ConfigSource) {
        self.source_attribution.insert(key.to_string(), source);
    }

    fn apply_file(&mut self, file: TomlConfig) -> Result<(), ConfigError> {
        let source = ConfigSource::Config;

        if let Some(plans) = file.plans {
            if let Some(root) = plans.root {
                self.plans_root = PathBuf::from(root);
                self.attribute("plans.root", source);
            }
            if let Some(identity) = plans.identity {
                self.identity = parse_identity("plans.identity", &identity)?;
                self.attribute("plans.identity", source);
            }
        }

        if let Some(status) = file.status {
            let mut policy = self.status;
            self.apply_consumer("status", status, &mut policy)?;
            self.status = policy;
        }
        if let Some(check) = file.check {
            let mut policy = self.check;
            self.apply_consumer("check", check, &mut policy)?;
            self.check = policy;
        }

        if let Some(validation) = file.validation {
            if let Some(min) = validation.plan_min_chars {
                self.validation.plan_min_chars = min;
                self.attribute("validation.plan_min_chars", source);
            }
            if let Some(min) = validation.executed_min_chars {
                self.validation.executed_min_chars = min;
                self.attribute("validation.executed_min_chars", source);
            }
        }

        if let Some(watch) = file.watch {
            if let Some(secs) = watch.interval_secs {
                self.watch.interval = Duration::from_secs(secs);
                self.attribute("watch.interval_secs", source);
            }
            if let Some(ms) = watch.debounce_ms {
                self.watch.debounce = Duration::from_millis(ms);
                self.attribute("watch.debounce_ms", source);
            }
        }

        Ok(())
    }

    fn apply_consumer(
        &mut self,
        table: &str,
        values: ConsumerTable,
        policy: &mut ConsumerPolicy,
    ) -> Result<(), ConfigError> {
        if let Some(order) = values.order {
            let key = format!("{table}.order");
            policy.order = parse_order(&key, &order)?;
            self.attribute(&key, ConfigSource::Config);
        }
        if let Some(rate) = values.empty_rate {
            let key = format!("{table}.empty_rate");
            policy.empty_rate = parse_rate(&key, rate)?;
            self.attribute(&key, ConfigSource::Config);
        }
        Ok(())
    }

    /// Search upward from `start_dir` for `.cascade/config.toml`, stopping at
    /// repository root markers (.git, .hg, .svn) or the filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = start_dir;

        loop {
            let config_path = current_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }

            if [".git", ".hg", ".svn"]
                .iter()
                .any(|marker| current_dir.join(marker).exists())
            {
                return None;
            }

            current_dir = current_dir.parent()?;
        }
    }

    /// Per-user configuration file, if one exists.
    #[must_use]
    pub fn user_config_file() -> Option<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("cascade").join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file())
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidFile(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))
    }
}

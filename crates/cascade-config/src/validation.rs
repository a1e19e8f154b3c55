use cascade_utils::error::ConfigError;
use std::time::Duration;

use crate::model::Config;

const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (key, rate) in [
            ("status.empty_rate", self.status.empty_rate),
            ("check.empty_rate", self.check.empty_rate),
        ] {
            if rate > 100 {
                return Err(invalid(key, "must be between 0 and 100"));
            }
        }

        if self.validation.plan_min_chars == 0 {
            return Err(invalid("validation.plan_min_chars", "must be greater than 0"));
        }
        if self.validation.executed_min_chars == 0 {
            return Err(invalid(
                "validation.executed_min_chars",
                "must be greater than 0",
            ));
        }

        if self.watch.interval.is_zero() {
            return Err(invalid("watch.interval_secs", "must be greater than 0"));
        }
        if self.watch.interval > MAX_INTERVAL {
            return Err(invalid(
                "watch.interval_secs",
                "exceeds maximum of 86400 seconds (24 hours)",
            ));
        }
        if self.watch.debounce.is_zero() {
            return Err(invalid("watch.debounce_ms", "must be greater than 0"));
        }
        if self.watch.debounce >= self.watch.interval {
            return Err(invalid(
                "watch.debounce_ms",
                "must be shorter than the polling interval",
            ));
        }

        if self.plans_root.as_os_str().is_empty() {
            return Err(invalid("plans.root", "must not be empty"));
        }

        Ok(())
    }
}

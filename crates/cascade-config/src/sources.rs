use std::collections::BTreeMap;

use crate::model::{Config, ConfigSource};

impl Config {
    /// Effective configuration as `key -> (value, source)`, sorted by key.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, ConfigSource)> {
        let source = |key: &str| {
            self.source_attribution
                .get(key)
                .copied()
                .unwrap_or(ConfigSource::Default)
        };

        [
            ("plans.root", self.plans_root.display().to_string()),
            ("plans.identity", self.identity.as_str().to_string()),
            ("status.order", self.status.order.as_str().to_string()),
            ("status.empty_rate", self.status.empty_rate.to_string()),
            ("check.order", self.check.order.as_str().to_string()),
            ("check.empty_rate", self.check.empty_rate.to_string()),
            (
                "validation.plan_min_chars",
                self.validation.plan_min_chars.to_string(),
            ),
            (
                "validation.executed_min_chars",
                self.validation.executed_min_chars.to_string(),
            ),
            ("watch.interval_secs", self.watch.interval.as_secs().to_string()),
            ("watch.debounce_ms", self.watch.debounce.as_millis().to_string()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), (value, source(key))))
        .collect()
    }
}

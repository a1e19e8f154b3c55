use std::path::PathBuf;

/// Configuration overrides collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub plans_root: Option<PathBuf>,
    pub identity: Option<String>,
    pub watch_interval_secs: Option<u64>,
}

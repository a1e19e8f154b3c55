use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Library-level error type with user-friendly reporting.
///
/// Compliance components never surface these for malformed plan documents;
/// those become issue strings inside a [`ValidationResult`](crate::types::ValidationResult).
/// `CascadeError` covers the failures around them: configuration, unreadable
/// directories, and output rendering.
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration errors |
/// | 3 | Everything else |
///
/// # Example
///
/// ```rust
/// use cascade_utils::error::{CascadeError, ConfigError};
/// use cascade_utils::exit_codes::ExitCode;
///
/// let err = CascadeError::Config(ConfigError::InvalidValue {
///     key: "identity".to_string(),
///     value: "fuzzy".to_string(),
/// });
/// assert_eq!(err.to_exit_code(), ExitCode::CLI_ARGS);
/// ```
#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid plans layout at {path}: {reason}")]
    Layout { path: PathBuf, reason: String },

    #[error("Failed to render {format} output: {reason}")]
    Render { format: String, reason: String },
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    fn user_message(&self) -> String;

    fn context(&self) -> Option<String>;

    fn suggestions(&self) -> Vec<String>;

    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for grouping in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    FileSystem,
    Output,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::FileSystem => write!(f, "File System"),
            Self::Output => write!(f, "Output"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration value '{key}' is invalid: {value}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
            Self::DiscoveryFailed { reason } => {
                format!("Could not discover configuration: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => {
                Some("Configuration files use TOML with [plans], [status], [check], [validation] and [watch] sections".to_string())
            }
            Self::InvalidValue { key, .. } => Some(format!(
                "The value for '{key}' came from the CLI, the environment or the config file"
            )),
            Self::NotFound { .. } => {
                Some("An explicit --config path must point to an existing file".to_string())
            }
            Self::DiscoveryFailed { .. } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax of .cascade/config.toml".to_string(),
                "Remove unknown keys from the configuration file".to_string(),
            ],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "identity" | "plans.identity" => vec!["Use 'regex' or 'split'".to_string()],
                "order" | "status.order" | "check.order" => {
                    vec!["Use 'filename' or 'modified'".to_string()]
                }
                _ => vec!["Run with --verbose to see where each value came from".to_string()],
            },
            Self::NotFound { .. } => vec![
                "Verify the path passed to --config".to_string(),
                "Omit --config to use discovery".to_string(),
            ],
            Self::DiscoveryFailed { .. } => {
                vec!["Pass an explicit --config path".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

impl UserFriendlyError for CascadeError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.user_message(),
            Self::Io { path, source } => {
                format!("Could not access {}: {source}", path.display())
            }
            Self::Layout { path, reason } => {
                format!("Plans directory {} is not usable: {reason}", path.display())
            }
            Self::Render { format, reason } => format!("Could not produce {format} output: {reason}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(err) => err.context(),
            Self::Io { .. } | Self::Layout { .. } => Some(
                "Plans are read from <root>/1_pre_exec_plans, 2_post_exec_plans and 3_checked_delta_exec_plans"
                    .to_string(),
            ),
            Self::Render { .. } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.suggestions(),
            Self::Io { .. } | Self::Layout { .. } => vec![
                "Check that --plans-root points at the .claude/plans directory".to_string(),
                "Verify directory permissions".to_string(),
            ],
            Self::Render { .. } => vec!["Retry without --json or --markdown".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Io { .. } | Self::Layout { .. } => ErrorCategory::FileSystem,
            Self::Render { .. } => ErrorCategory::Output,
        }
    }
}

impl CascadeError {
    /// Wrap a serialization failure of a report or summary.
    #[must_use]
    pub fn render(format: &str, error: &anyhow::Error) -> Self {
        Self::Render {
            format: format.to_string(),
            reason: format!("{error:#}"),
        }
    }

    /// Message, context and suggestions formatted for the terminal.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Map this error to the CLI exit code. Single source of truth for the CLI.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Io { .. } | Self::Layout { .. } | Self::Render { .. } => ExitCode::INTERNAL,
        }
    }
}

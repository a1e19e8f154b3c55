//! CLI argument definitions and parsing structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cascade - three-phase planning compliance
#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "Compliance checks for plan → execute → verify document trees")]
#[command(long_about = r#"
cascade checks that every plan under .claude/plans went through all three
phases: a pre-execution plan, an execution report and a verification report.

EXAMPLES:
  # Gate a pull request (exit 1 when the newest plan is not compliant)
  cascade check

  # Markdown body for a PR comment
  cascade check --markdown

  # Completion rate across all plans
  cascade status --json

  # Keep a status line current while editing plans
  cascade watch

  # Show how plan filenames are parsed
  cascade names 20250101_120000_AUTH_REFACTOR_EXECUTED.md

CONFIGURATION:
  Precedence: CLI flags > CASCADE_PLANS_ROOT > config file > defaults
  The config file is discovered by searching upward from CWD for
  .cascade/config.toml, then in the user config directory
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the three phase directories
    #[arg(long, global = true, value_name = "DIR")]
    pub plans_root: Option<PathBuf>,

    /// Plan identity algorithm: regex or split
    #[arg(long, global = true, value_name = "ALGORITHM")]
    pub identity: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the newest plan of each phase and their consistency
    ///
    /// Exit code 0 when compliant, 1 otherwise.
    Check {
        /// Output the report as canonical JSON
        #[arg(long, conflicts_with = "markdown")]
        json: bool,

        /// Output a Markdown pull-request comment body
        #[arg(long)]
        markdown: bool,
    },

    /// Show completion status for every plan
    Status {
        /// Output status as canonical JSON
        #[arg(long)]
        json: bool,
    },

    /// Recompute the status whenever the plans tree changes
    Watch {
        /// Refresh interval in seconds
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,

        /// Print one status line and exit
        #[arg(long)]
        once: bool,
    },

    /// Show timestamp and identity parsing for plan filenames
    Names {
        /// Filenames to parse
        #[arg(required = true)]
        filenames: Vec<String>,

        /// Output as canonical JSON
        #[arg(long)]
        json: bool,
    },
}

/// Build the CLI command for testing and introspection
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}

//! Command implementations for the cascade CLI

use anyhow::{Context, Result};
use cascade_gate::{
    ComplianceCheck, ComplianceOptions, emit_report_json, exit_code_for, merge_label,
    render_markdown, render_text,
};
use cascade_plans::naming::{divergence, timestamp_or};
use cascade_plans::{IdentityAlgorithm, TimestampFallback};
use cascade_status::{StatusManager, StatusWatcher};
use cascade_utils::canonicalization::emit_jcs;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{Config, ExitCode};

/// Output format of `cascade check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_flags(json: bool, markdown: bool) -> Self {
        match (json, markdown) {
            (true, _) => Self::Json,
            (false, true) => Self::Markdown,
            (false, false) => Self::Text,
        }
    }
}

fn compliance_options(config: &Config) -> ComplianceOptions {
    ComplianceOptions {
        identity: config.identity,
        order: config.check.order,
        limits: config.validation,
    }
}

fn status_manager(config: &Config) -> StatusManager {
    StatusManager::new(config.layout(), config.identity, config.status)
}

// ============================================================================
// Check Command
// ============================================================================

/// Run the compliance check and print the report.
///
/// A non-compliant report is not an error: it is reported through the
/// returned exit code.
pub fn execute_check_command(config: &Config, format: ReportFormat) -> Result<ExitCode> {
    let report = ComplianceCheck::new(config.layout(), compliance_options(config)).execute();

    match format {
        ReportFormat::Json => println!("{}", emit_report_json(&report)?),
        ReportFormat::Markdown => print!("{}", render_markdown(&report)),
        ReportFormat::Text => {
            print!("{}", render_text(&report));
            println!();
            println!("Label: {}", merge_label(&report));
        }
    }

    Ok(exit_code_for(&report))
}

// ============================================================================
// Status Command
// ============================================================================

pub fn execute_status_command(config: &Config, json: bool) -> Result<()> {
    let summary = status_manager(config).summarize();
    if json {
        println!("{}", summary.to_json()?);
    } else {
        print!("{}", summary.render_text());
    }
    Ok(())
}

// ============================================================================
// Watch Command
// ============================================================================

pub async fn execute_watch_command(config: &Config, once: bool) -> Result<()> {
    let manager = status_manager(config);
    if once {
        println!("{}", manager.summarize().status_line());
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Interrupt received, stopping watch"),
            Err(e) => warn!(error = %e, "Failed to listen for interrupt"),
        }
        let _ = shutdown_tx.send(true);
    });

    StatusWatcher::new(manager, config.watch)
        .run(shutdown_rx, |summary| println!("{}", summary.status_line()))
        .await
        .context("Watch loop failed")
}

// ============================================================================
// Names Command
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NameReport<'a> {
    filename: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    regex_identity: String,
    split_identity: String,
    diverges: bool,
}

impl<'a> NameReport<'a> {
    fn new(filename: &'a str) -> Self {
        Self {
            filename,
            timestamp: timestamp_or(filename, TimestampFallback::Empty).map(|t| t.to_string()),
            regex_identity: IdentityAlgorithm::Regex.extract(filename).to_string(),
            split_identity: IdentityAlgorithm::Split.extract(filename).to_string(),
            diverges: divergence(filename).is_some(),
        }
    }
}

/// Print how each filename is parsed by both identity algorithms.
pub fn execute_names_command(filenames: &[String], json: bool) -> Result<()> {
    let reports: Vec<NameReport<'_>> = filenames.iter().map(|f| NameReport::new(f)).collect();

    if json {
        println!("{}", emit_jcs(&reports)?);
        return Ok(());
    }

    for report in &reports {
        println!("{}", report.filename);
        println!(
            "  timestamp: {}",
            report.timestamp.as_deref().unwrap_or("(none)")
        );
        println!("  regex:     {}", report.regex_identity);
        println!("  split:     {}", report.split_identity);
        if report.diverges {
            println!("  ⚠ identity algorithms disagree");
        }
    }
    Ok(())
}

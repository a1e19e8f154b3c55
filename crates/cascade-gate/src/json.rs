//! JSON emission for compliance reports

use cascade_utils::canonicalization::emit_jcs;
use cascade_utils::error::CascadeError;
use cascade_utils::types::ComplianceReport;

/// Emit a compliance report as canonical JSON (JCS, RFC 8785).
///
/// Keys are sorted and whitespace is fixed, so two runs over the same tree
/// produce byte-identical output.
pub fn emit_report_json(report: &ComplianceReport) -> anyhow::Result<String> {
    emit_jcs(report).map_err(|e| CascadeError::render("compliance report JSON", &e).into())
}

//! JCS (RFC 8785) JSON emission for the cascade JSON contracts.

use anyhow::{Context, Result};
use serde::Serialize;

/// Emit a value as canonical JSON.
///
/// Keys are sorted and whitespace is removed so that two runs over an
/// unchanged plans tree produce byte-identical output.
pub fn emit_jcs<T: Serialize>(value: &T) -> Result<String> {
    let json_value =
        serde_json::to_value(value).with_context(|| "Failed to serialize value to JSON")?;
    let json_bytes = serde_json_canonicalizer::to_vec(&json_value)
        .with_context(|| "Failed to canonicalize JSON using JCS")?;
    String::from_utf8(json_bytes).with_context(|| "JCS output contained invalid UTF-8")
}

//! Serialization boundary: document text in, document text out.
//!
//! Every engine call starts by parsing the caller's text and, when it
//! mutates, ends with a full re-stringify. Key order is preserved through
//! the round trip (`serde_json` with `preserve_order`); output uses stable
//! two-space indentation.

use serde_json::Value;

use crate::ops::EngineError;

/// Parse document text into a value.
///
/// A parse failure is the document-invalid error and aborts the whole call
/// before any mutation is attempted.
pub fn parse(text: &str) -> Result<Value, EngineError> {
    serde_json::from_str(text).map_err(|e| EngineError::InvalidDocument(e.to_string()))
}

/// Serialize a value back to text with two-space indentation.
pub fn stringify(doc: &Value) -> String {
    // Value serialization is infallible; the fallback is unreachable.
    serde_json::to_string_pretty(doc).unwrap_or_default()
}

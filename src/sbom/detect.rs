//! Shallow schema detection for uploaded SBOM documents.
//!
//! Detection is a fast sniff over two top-level signals, not a structural
//! validation: extraction downstream tolerates any further malformation
//! field by field.

use crate::models::sbom::SbomFormat;
use serde_json::Value;

/// Classify a parsed JSON value as CycloneDX, SPDX, or neither.
///
/// - Non-object values are `Other`.
/// - `bomFormat` equal to the literal string `"CycloneDX"` wins first.
/// - Otherwise a string-typed `spdxVersion` or `SPDXID` field means SPDX.
pub fn detect_format(doc: &Value) -> SbomFormat {
    let Some(obj) = doc.as_object() else {
        return SbomFormat::Other;
    };

    if obj.get("bomFormat").and_then(Value::as_str) == Some("CycloneDX") {
        return SbomFormat::Cyclonedx;
    }

    if obj.get("spdxVersion").is_some_and(Value::is_string)
        || obj.get("SPDXID").is_some_and(Value::is_string)
    {
        return SbomFormat::Spdx;
    }

    SbomFormat::Other
}

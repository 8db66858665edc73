//! Represents one software unit extracted from an SBOM.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A normalized component row belonging to exactly one SBOM.
///
/// Every field except `name` is optional — extraction degrades missing or
/// malformed source fields to `None` instead of failing. `metadata` holds
/// the original source element serialized verbatim; the service never
/// inspects its structure.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Component {
    /// Unique identifier for this component row.
    pub id: Uuid,

    /// Foreign key linking to the parent SBOM.
    pub sbom_id: Uuid,

    /// Component name. Never empty; defaulted to `"unknown"` during
    /// extraction when the source element carries none.
    pub name: String,

    /// Version string, if present.
    pub version: Option<String>,

    /// Package URL identifying the package and its ecosystem.
    pub purl: Option<String>,

    /// Namespace/group (CycloneDX `group`).
    #[serde(rename = "group")]
    pub group_name: Option<String>,

    /// Component kind (CycloneDX `type`, e.g. "library").
    #[serde(rename = "type")]
    pub component_type: Option<String>,

    /// Supplier name.
    pub supplier: Option<String>,

    /// Resolved license identifier or expression.
    pub license: Option<String>,

    /// Dependency scope. Currently always absent; kept for schema parity
    /// with the normalized record shape.
    pub scope: Option<String>,

    /// Original source element, serialized as JSON text.
    pub metadata: Option<String>,
}

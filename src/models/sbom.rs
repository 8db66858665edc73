//! Represents one ingested SBOM document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Schema a document was detected as.
///
/// Decided once by the format detector and never re-derived per field
/// access. `Other` documents are rejected before any row is created, so a
/// persisted SBOM only ever carries `CYCLONEDX` or `SPDX`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SbomFormat {
    Cyclonedx,
    Spdx,
    Other,
}

/// Visible ingestion state of an SBOM.
///
/// `Parsing` exists only inside the ingestion transaction; a committed row
/// is always `Ready`. There is no persisted failure state — a failed
/// ingestion leaves no row at all.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SbomStatus {
    Parsing,
    Ready,
}

/// One ingested SBOM document.
///
/// The original upload is retained verbatim in `raw_json` for audit and
/// reparse; everything queryable lives in the extracted component rows.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Sbom {
    /// Unique identifier for this SBOM.
    pub id: Uuid,

    /// Foreign key linking to the owning project.
    pub project_id: Uuid,

    /// Caller-supplied display name.
    pub name: String,

    /// Original filename of the uploaded document.
    pub filename: String,

    /// Detected document schema.
    pub format: SbomFormat,

    /// Schema version string when the document carries one
    /// (`specVersion` / `spdxVersion`).
    pub spec_version: Option<String>,

    /// Ingestion state. Invariant: `Ready` iff `parsed_at` is set iff all
    /// component rows are durably persisted.
    pub status: SbomStatus,

    /// When the upload was received.
    pub uploaded_at: DateTime<Utc>,

    /// When extraction finished and the row flipped to `Ready`.
    pub parsed_at: Option<DateTime<Utc>>,

    /// The uploaded document, byte-for-byte as received. Kept out of API
    /// responses; it exists for audit and reparse.
    #[serde(skip_serializing)]
    pub raw_json: String,
}

//! Represents a project — the container SBOM documents are uploaded into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A project grouping one or more ingested SBOMs.
///
/// Authorization to write into a project is established by the caller
/// before ingestion starts; the service itself only verifies existence.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Project {
    /// Unique identifier for this project.
    pub id: Uuid,

    /// Human-readable project name.
    pub name: String,

    /// When this project was created.
    pub created_at: DateTime<Utc>,
}

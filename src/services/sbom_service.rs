//! src/services/sbom_service.rs
//!
//! SbomService — the transactional ingestion pipeline plus the queries the
//! HTTP surface needs, backed by SQLite. Detection and extraction are pure
//! and happen before this service is invoked; this file owns everything
//! that touches the database.

use crate::models::{
    component::Component,
    project::Project,
    sbom::{Sbom, SbomFormat, SbomStatus},
};
use crate::sbom::normalize::{NormalizedComponent, ParsedSbom};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Default number of component rows per INSERT batch. Bounds the size of
/// each storage call; carries no ordering or uniqueness guarantee.
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Default ceiling on the raw uploaded document, enforced before any
/// parsing or storage work begins.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Everything the pipeline needs to ingest one document.
///
/// `raw_json` is the upload byte-for-byte as received; `parsed` is the
/// detector + normalizer output for the same bytes.
#[derive(Clone, Debug)]
pub struct SbomUpload {
    pub project_id: Uuid,
    pub name: String,
    pub filename: String,
    pub raw_json: String,
    pub parsed: ParsedSbom,
}

/// One row of the SBOM listing, with its project and component count.
#[derive(Serialize, sqlx::FromRow, Debug)]
pub struct SbomListItem {
    pub id: Uuid,
    pub name: String,
    pub filename: String,
    pub format: SbomFormat,
    pub status: SbomStatus,
    pub uploaded_at: DateTime<Utc>,
    pub project_id: Uuid,
    pub project_name: String,
    pub component_count: i64,
}

/// SBOM detail view: the document row, its project, the first page of
/// components (ordered by name) and the total count.
#[derive(Serialize, Debug)]
pub struct SbomDetail {
    #[serde(flatten)]
    pub sbom: Sbom,
    pub project: Project,
    pub components: Vec<Component>,
    pub component_count: i64,
}

#[derive(Debug, Error)]
pub enum SbomError {
    #[error("unsupported or empty SBOM")]
    UnsupportedOrEmpty,
    #[error("project `{0}` not found")]
    ProjectNotFound(Uuid),
    #[error("SBOM `{0}` not found")]
    SbomNotFound(Uuid),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type SbomResult<T> = Result<T, SbomError>;

/// SbomService provides the ingestion pipeline and read-side queries:
/// - Ingest a parsed document (one atomic transaction: create, batch
///   insert components, flip status to READY)
/// - List SBOMs with optional component-name search
/// - Fetch SBOM detail
/// - Delete an SBOM together with its components
/// - List/create projects
///
/// A rejected or failed ingestion leaves no rows behind: rejection happens
/// before the transaction opens, and any failure inside it rolls the whole
/// unit of work back.
#[derive(Clone)]
pub struct SbomService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,

    /// Component rows per INSERT batch.
    pub chunk_size: usize,

    /// Raw upload byte ceiling, read by the upload handler.
    pub max_upload_bytes: usize,
}

impl SbomService {
    pub fn new(db: Arc<SqlitePool>, chunk_size: usize, max_upload_bytes: usize) -> Self {
        Self {
            db,
            chunk_size: chunk_size.max(1),
            max_upload_bytes,
        }
    }

    /// Ingest one document: reject-or-commit.
    ///
    /// Rejects with `UnsupportedOrEmpty` when the format is unrecognized or
    /// no components were extracted — nothing is written on that path.
    /// Otherwise runs one transaction: SBOM row in PARSING, component
    /// batches, then the READY update with `parsed_at` set. Any failure
    /// inside rolls everything back; errors are surfaced verbatim, never
    /// retried. Returns the new SBOM's id.
    pub async fn ingest(&self, upload: SbomUpload) -> SbomResult<Uuid> {
        if upload.parsed.format == SbomFormat::Other || upload.parsed.components.is_empty() {
            return Err(SbomError::UnsupportedOrEmpty);
        }

        self.fetch_project(upload.project_id).await?;

        let sbom_id = Uuid::new_v4();
        let mut tx = self.db.begin().await?;

        sqlx::query(
            "INSERT INTO sboms (id, project_id, name, filename, format, spec_version,
                                status, uploaded_at, parsed_at, raw_json)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL, ?)",
        )
        .bind(sbom_id)
        .bind(upload.project_id)
        .bind(&upload.name)
        .bind(&upload.filename)
        .bind(upload.parsed.format)
        .bind(upload.parsed.spec_version.as_deref())
        .bind(SbomStatus::Parsing)
        .bind(Utc::now())
        .bind(&upload.raw_json)
        .execute(&mut *tx)
        .await?;

        for batch in upload.parsed.components.chunks(self.chunk_size) {
            Self::insert_components(&mut tx, sbom_id, batch).await?;
        }

        sqlx::query("UPDATE sboms SET status = ?, parsed_at = ? WHERE id = ?")
            .bind(SbomStatus::Ready)
            .bind(Utc::now())
            .bind(sbom_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            "ingested sbom {} ({} components, format {:?})",
            sbom_id,
            upload.parsed.components.len(),
            upload.parsed.format
        );

        Ok(sbom_id)
    }

    /// Insert one batch of component rows with a multi-row VALUES clause.
    async fn insert_components(
        tx: &mut Transaction<'_, Sqlite>,
        sbom_id: Uuid,
        batch: &[NormalizedComponent],
    ) -> SbomResult<()> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "INSERT INTO components (id, sbom_id, name, version, purl, group_name, \
             component_type, supplier, license, scope, metadata) ",
        );
        builder.push_values(batch, |mut row, component| {
            row.push_bind(Uuid::new_v4())
                .push_bind(sbom_id)
                .push_bind(component.name.clone())
                .push_bind(component.version.clone())
                .push_bind(component.purl.clone())
                .push_bind(component.group.clone())
                .push_bind(component.component_type.clone())
                .push_bind(component.supplier.clone())
                .push_bind(component.license.clone())
                .push_bind(component.scope.clone())
                .push_bind(component.metadata.to_string());
        });
        builder.build().execute(&mut **tx).await?;
        Ok(())
    }

    /// List the 50 most recent SBOMs, optionally filtered to those
    /// containing a component whose name matches `search`
    /// (case-insensitive substring).
    pub async fn list_sboms(&self, search: Option<&str>) -> SbomResult<Vec<SbomListItem>> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT s.id, s.name, s.filename, s.format, s.status, s.uploaded_at, \
             p.id AS project_id, p.name AS project_name, \
             (SELECT COUNT(*) FROM components c WHERE c.sbom_id = s.id) AS component_count \
             FROM sboms s JOIN projects p ON p.id = s.project_id",
        );

        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            builder.push(
                " WHERE EXISTS (SELECT 1 FROM components c \
                 WHERE c.sbom_id = s.id AND LOWER(c.name) LIKE ",
            );
            builder.push_bind(format!("%{}%", term.to_lowercase()));
            builder.push(")");
        }

        builder.push(" ORDER BY s.uploaded_at DESC LIMIT 50");

        let items = builder.build_query_as().fetch_all(&*self.db).await?;
        Ok(items)
    }

    /// Fetch one SBOM with its project, first 100 components (by name) and
    /// total component count. Returns SbomNotFound if missing.
    pub async fn get_sbom(&self, id: Uuid) -> SbomResult<SbomDetail> {
        let sbom = sqlx::query_as::<_, Sbom>(
            "SELECT id, project_id, name, filename, format, spec_version,
                    status, uploaded_at, parsed_at, raw_json
             FROM sboms WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => SbomError::SbomNotFound(id),
            other => SbomError::Sqlx(other),
        })?;

        let project = self.fetch_project(sbom.project_id).await?;

        let components = sqlx::query_as::<_, Component>(
            "SELECT id, sbom_id, name, version, purl, group_name, component_type,
                    supplier, license, scope, metadata
             FROM components WHERE sbom_id = ? ORDER BY name ASC LIMIT 100",
        )
        .bind(id)
        .fetch_all(&*self.db)
        .await?;

        let component_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM components WHERE sbom_id = ?")
                .bind(id)
                .fetch_one(&*self.db)
                .await?;

        Ok(SbomDetail {
            sbom,
            project,
            components,
            component_count,
        })
    }

    /// Delete an SBOM and all of its components in one transaction.
    ///
    /// Children go first; SQLite only honors ON DELETE CASCADE when the
    /// foreign_keys pragma is on per connection, so the cascade is explicit.
    pub async fn delete_sbom(&self, id: Uuid) -> SbomResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM components WHERE sbom_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM sboms WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the component delete.
            return Err(SbomError::SbomNotFound(id));
        }

        tx.commit().await?;
        debug!("deleted sbom {}", id);
        Ok(())
    }

    /// List all projects, oldest first.
    pub async fn list_projects(&self) -> SbomResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, name, created_at FROM projects ORDER BY created_at ASC",
        )
        .fetch_all(&*self.db)
        .await?;
        Ok(projects)
    }

    /// Create a project. Name validation (trim, non-empty) is the
    /// handler's job.
    pub async fn create_project(&self, name: &str) -> SbomResult<Project> {
        let project = Project {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO projects (id, name, created_at) VALUES (?, ?, ?)")
            .bind(project.id)
            .bind(&project.name)
            .bind(project.created_at)
            .execute(&*self.db)
            .await?;

        Ok(project)
    }

    /// Fetch project metadata, mapping a missing row to ProjectNotFound.
    pub async fn fetch_project(&self, id: Uuid) -> SbomResult<Project> {
        sqlx::query_as::<_, Project>("SELECT id, name, created_at FROM projects WHERE id = ?")
            .bind(id)
            .fetch_one(&*self.db)
            .await
            .map_err(|err| match err {
                sqlx::Error::RowNotFound => SbomError::ProjectNotFound(id),
                other => SbomError::Sqlx(other),
            })
    }
}

//! Defines routes for the SBOM ingestion API.
//!
//! ## Structure
//! - **SBOM endpoints**
//!   - `POST   /api/sboms` — upload + ingest a document (multipart)
//!   - `GET    /api/sboms` — list latest SBOMs (supports ?search=)
//!   - `GET    /api/sboms/{id}` — SBOM detail with first 100 components
//!   - `DELETE /api/sboms/{id}` — delete SBOM and its components
//!
//! - **Project endpoints**
//!   - `GET    /api/projects` — list projects
//!   - `POST   /api/projects` — create project
//!
//! The body limit caps uploads before any parsing or storage work happens.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        project_handlers::{create_project, list_projects},
        sbom_handlers::{delete_sbom, get_sbom, list_sboms, upload_sbom},
    },
    services::sbom_service::SbomService,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Headroom on top of the document ceiling for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build and return the router for the SBOM ingestion API.
///
/// The router carries shared state (`SbomService`) to all handlers.
/// `max_upload_bytes` is the raw document ceiling; the transport-level
/// limit sits slightly above it so the handler can reject oversized files
/// with a precise 413 instead of a generic body-limit error.
pub fn routes(max_upload_bytes: usize) -> Router<SbomService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // SBOM routes
        .route("/api/sboms", post(upload_sbom).get(list_sboms))
        .route("/api/sboms/{id}", get(get_sbom).delete(delete_sbom))
        // Project routes
        .route("/api/projects", get(list_projects).post(create_project))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
}

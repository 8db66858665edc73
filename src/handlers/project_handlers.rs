//! HTTP handlers for project listing and creation.

use crate::{errors::AppError, services::sbom_service::SbomService};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

/// Request body for `POST /api/projects`.
#[derive(Debug, Deserialize)]
pub struct CreateProjectReq {
    pub name: Option<String>,
}

/// GET `/api/projects` — all projects, oldest first.
pub async fn list_projects(
    State(service): State<SbomService>,
) -> Result<impl IntoResponse, AppError> {
    let projects = service.list_projects().await?;
    Ok(Json(json!({ "projects": projects })))
}

/// POST `/api/projects` — create a project. Name is trimmed and must be
/// non-empty.
pub async fn create_project(
    State(service): State<SbomService>,
    Json(payload): Json<CreateProjectReq>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("project name required"));
    }

    let project = service.create_project(&name).await?;
    Ok((StatusCode::CREATED, Json(json!({ "project": project }))))
}

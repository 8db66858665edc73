//! HTTP handlers for SBOM upload, listing, detail, and deletion.
//!
//! The upload handler owns everything the ingestion core assumes is
//! already done: the size ceiling, JSON parsing, and the project identity.
//! Detection, extraction, and the atomic write are delegated to
//! `sbom::parse_sbom` and `SbomService::ingest`.

use crate::{
    errors::AppError,
    sbom::parse_sbom,
    services::sbom_service::{SbomService, SbomUpload},
};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

/// Query params accepted by the SBOM listing.
#[derive(Debug, Deserialize)]
pub struct ListSbomsQuery {
    pub search: Option<String>,
}

/// POST `/api/sboms` — multipart upload (`file`, `name`, `project_id`).
///
/// Responds 201 with the created SBOM's id, 400 for malformed input or an
/// unsupported/empty document, 404 for an unknown project, and 413 when
/// the raw document exceeds the configured ceiling.
pub async fn upload_sbom(
    State(service): State<SbomService>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut name: Option<String> = None;
    let mut project_id: Option<Uuid> = None;
    let mut filename: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(format!("invalid multipart body: {}", err)))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::bad_request(err.to_string()))?;
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    name = Some(trimmed.to_string());
                }
            }
            Some("project_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::bad_request(err.to_string()))?;
                project_id = Some(
                    value
                        .trim()
                        .parse::<Uuid>()
                        .map_err(|_| AppError::bad_request("invalid project_id"))?,
                );
            }
            Some("file") => {
                filename = field.file_name().map(|f| f.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::bad_request(err.to_string()))?;
                file_bytes = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let (Some(name), Some(project_id), Some(file_bytes)) = (name, project_id, file_bytes) else {
        return Err(AppError::bad_request("missing file/name/project_id"));
    };

    // Size ceiling applies to the raw document, before any parsing.
    if file_bytes.len() > service.max_upload_bytes {
        return Err(AppError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("file too large (max {} bytes)", service.max_upload_bytes),
        ));
    }

    let raw_json = String::from_utf8(file_bytes)
        .map_err(|_| AppError::bad_request("invalid JSON: not valid UTF-8"))?;

    let doc: Value = serde_json::from_str(&raw_json)
        .map_err(|err| AppError::bad_request(format!("invalid JSON: {}", err)))?;

    let parsed = parse_sbom(&doc);

    let sbom_id = service
        .ingest(SbomUpload {
            project_id,
            name,
            filename: filename.unwrap_or_else(|| "upload.json".to_string()),
            raw_json,
            parsed,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "sbom_id": sbom_id }))))
}

/// GET `/api/sboms` — latest 50 SBOMs, optional `?search=` filter on
/// component names.
pub async fn list_sboms(
    State(service): State<SbomService>,
    Query(q): Query<ListSbomsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let items = service.list_sboms(q.search.as_deref()).await?;
    Ok(Json(json!({ "items": items })))
}

/// GET `/api/sboms/{id}` — SBOM detail with its first 100 components.
pub async fn get_sbom(
    State(service): State<SbomService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = service.get_sbom(id).await?;
    Ok(Json(detail))
}

/// DELETE `/api/sboms/{id}` — remove the SBOM and all its components.
pub async fn delete_sbom(
    State(service): State<SbomService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_sbom(id).await?;
    Ok(Json(json!({ "ok": true })))
}

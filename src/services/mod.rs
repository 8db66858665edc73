//! Service layer: persistence and the transactional ingestion pipeline.

pub mod sbom_service;

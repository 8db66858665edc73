//! Core data models for the SBOM ingestion service.
//!
//! These entities represent projects, ingested SBOM documents, and the
//! normalized components extracted from them. They map cleanly to database
//! tables via `sqlx::FromRow` and serialize naturally as JSON via `serde`.

pub mod component;
pub mod project;
pub mod sbom;

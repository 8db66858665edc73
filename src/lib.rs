//! SBOM ingestion and storage service.
//!
//! Accepts CycloneDX and SPDX documents as JSON, detects the schema,
//! extracts normalized component records, and persists everything
//! atomically: an SBOM row is only ever observable as READY with its full
//! component set, or not at all.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sbom;
pub mod services;

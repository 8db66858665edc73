//! HTTP handlers, grouped by resource.

pub mod health_handlers;
pub mod project_handlers;
pub mod sbom_handlers;

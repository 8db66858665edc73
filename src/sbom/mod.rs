//! The pure ingestion core: format detection and component normalization.
//!
//! Everything in this module is a deterministic function of the parsed
//! document — no I/O, no storage. The persistence side lives in
//! `services::sbom_service`.

pub mod detect;
pub mod normalize;

pub use detect::detect_format;
pub use normalize::{NormalizedComponent, ParsedSbom, parse_sbom};

use crate::services::sbom_service::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_UPLOAD_BYTES};
use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub chunk_size: usize,
    pub max_upload_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "SBOM ingestion and storage API")]
pub struct Args {
    /// Host to bind to (overrides SBOM_STORE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides SBOM_STORE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides SBOM_STORE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Component rows per insert batch (overrides SBOM_STORE_CHUNK_SIZE)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Maximum raw upload size in bytes (overrides SBOM_STORE_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("SBOM_STORE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("SBOM_STORE_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing SBOM_STORE_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading SBOM_STORE_PORT"),
        };
        let env_db = env::var("SBOM_STORE_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/sbom_store.db".into());
        let env_chunk = match env::var("SBOM_STORE_CHUNK_SIZE") {
            Ok(value) => value
                .parse::<usize>()
                .with_context(|| format!("parsing SBOM_STORE_CHUNK_SIZE value `{}`", value))?,
            Err(env::VarError::NotPresent) => DEFAULT_CHUNK_SIZE,
            Err(err) => return Err(err).context("reading SBOM_STORE_CHUNK_SIZE"),
        };
        let env_max_upload = match env::var("SBOM_STORE_MAX_UPLOAD_BYTES") {
            Ok(value) => value.parse::<usize>().with_context(|| {
                format!("parsing SBOM_STORE_MAX_UPLOAD_BYTES value `{}`", value)
            })?,
            Err(env::VarError::NotPresent) => DEFAULT_MAX_UPLOAD_BYTES,
            Err(err) => return Err(err).context("reading SBOM_STORE_MAX_UPLOAD_BYTES"),
        };

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            chunk_size: args.chunk_size.unwrap_or(env_chunk),
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max_upload),
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

//! Server settings from the environment.

use std::path::PathBuf;

use fho_verify_ingest::{DataCatalog, IngestError};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;

/// Everything `run_server` needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address, `BIND_ADDR`.
    pub bind_addr: String,
    /// Listen port, `PORT`.
    pub port: u16,
    /// Frontend assets, `FHO_STATIC_DIR`.
    pub static_dir: PathBuf,
    /// Archive layout.
    pub catalog: DataCatalog,
}

impl ServerConfig {
    /// Reads the configuration. An unparseable `PORT` falls back to the
    /// default.
    ///
    /// # Errors
    ///
    /// * If the archive configuration is invalid
    pub fn from_env() -> Result<Self, IngestError> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let static_dir =
            std::env::var("FHO_STATIC_DIR").map_or_else(|_| PathBuf::from("static"), PathBuf::from);

        Ok(Self {
            bind_addr,
            port,
            static_dir,
            catalog: DataCatalog::from_env()?,
        })
    }
}

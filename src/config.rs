//! # Configuration
//!
//! [`CatalogConfig`] is read from an optional TOML file and then overridden by
//! environment variables:
//!
//! ```toml
//! base_url = "https://fakestoreapi.com/products"
//! storage_dir = "/var/lib/dashboard/overrides"
//! request_timeout_ms = 5000
//! ```
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CATALOG_BASE_URL` | `base_url` |
//! | `CATALOG_STORAGE_DIR` | `storage_dir` |
//! | `CATALOG_REQUEST_TIMEOUT_MS` | `request_timeout_ms` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::CatalogError;

pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com/products";
pub const DEFAULT_STORAGE_DIR: &str = ".catalog-overrides";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

pub const ENV_BASE_URL: &str = "CATALOG_BASE_URL";
pub const ENV_STORAGE_DIR: &str = "CATALOG_STORAGE_DIR";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "CATALOG_REQUEST_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Collection URL of the remote product endpoint.
    pub base_url: String,
    /// Directory holding the durable override ledgers.
    pub storage_dir: PathBuf,
    pub request_timeout_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl CatalogConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        toml::from_str(source).map_err(|e| CatalogError::Config(e.to_string()))
    }

    /// Reads a TOML file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading catalog config");
        let source = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self, CatalogError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CatalogError> {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(dir) = lookup(ENV_STORAGE_DIR) {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            self.request_timeout_ms = raw.trim().parse().map_err(|_| {
                CatalogError::Config(format!(
                    "{ENV_REQUEST_TIMEOUT_MS} must be an integer, got {raw:?}"
                ))
            })?;
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

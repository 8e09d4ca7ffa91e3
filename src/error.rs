//! Error types for catalog operations.

use thiserror::Error;

use crate::ledger::StoreError;
use crate::model::ProductId;

/// Errors that can occur during catalog operations.
///
/// Remote failures on the write path are logged and swallowed by
/// [`CatalogService`](crate::lifecycle::CatalogService); on the read path they
/// reach the caller unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// The remote answered 404, or the product was deleted locally.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Any other non-2xx status, a transport failure, or an unreadable body.
    #[error("Remote catalog unavailable: {0}")]
    RemoteUnavailable(String),

    /// Submitted fields were rejected before reaching the core.
    #[error("Product validation error: {0}")]
    Validation(String),

    /// The durable override store could not be read or written.
    #[error("Override storage error: {0}")]
    Storage(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        CatalogError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::RemoteUnavailable(err.to_string())
    }
}

//! KeyValueStore - the durable text store the ledgers live in.

use thiserror::Error;

/// Storage key of the Created ledger (JSON array of products).
pub const CREATED_KEY: &str = "products_created";
/// Storage key of the Updated ledger (JSON object keyed by decimal id).
pub const UPDATED_KEY: &str = "products_updated";
/// Storage key of the Deleted ledger (JSON array of ids).
pub const DELETED_KEY: &str = "products_deleted";

/// Errors raised by a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Client-scoped string store. An absent key reads as `None`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

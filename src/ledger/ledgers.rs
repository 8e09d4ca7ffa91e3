//! The three override ledgers and their recording operations.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::store::{CREATED_KEY, DELETED_KEY, UPDATED_KEY};
use super::{KeyValueStore, StoreError};
use crate::error::CatalogError;
use crate::model::{Product, ProductId};
use crate::reconcile::reconcile;

/// Point-in-time copy of all three ledgers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSnapshot {
    /// Locally created products, in creation order.
    pub created: Vec<Product>,
    /// Full replacement records for remote-origin ids.
    pub updated: BTreeMap<ProductId, Product>,
    /// Ids suppressed from every snapshot.
    pub deleted: BTreeSet<ProductId>,
}

impl LedgerSnapshot {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Local record of create/update/delete intent, persisted in a [`KeyValueStore`].
///
/// Every `record_*` call is one read-modify-write under an in-process lock.
/// Writers in other processes sharing the same storage are not coordinated
/// with; the last write wins.
pub struct OverrideLedgers<S: KeyValueStore> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> OverrideLedgers<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads a ledger for modification. Unparsable content counts as empty,
    /// but an unreadable store is an error so the write cannot clobber it.
    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "Discarding corrupted ledger");
                Ok(T::default())
            }
        }
    }

    /// Reads a ledger for display. Never fails.
    fn load_or_empty<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load(key).unwrap_or_else(|e| {
            warn!(key, error = %e, "Ledger unreadable, treating as empty");
            T::default()
        })
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CatalogError> {
        let raw = serde_json::to_string(value).map_err(|e| CatalogError::Storage(e.to_string()))?;
        self.store.set(key, &raw)?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, CatalogError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned.into())
    }

    pub fn created(&self) -> Vec<Product> {
        self.load_or_empty(CREATED_KEY)
    }

    pub fn updated(&self) -> BTreeMap<ProductId, Product> {
        self.load_or_empty(UPDATED_KEY)
    }

    pub fn deleted(&self) -> BTreeSet<ProductId> {
        self.load_or_empty(DELETED_KEY)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            created: self.created(),
            updated: self.updated(),
            deleted: self.deleted(),
        }
    }

    /// Overlays the ledgers onto a freshly fetched remote snapshot.
    pub fn reconcile(&self, remote: Vec<Product>) -> Vec<Product> {
        reconcile(remote, &self.snapshot())
    }

    /// Appends a locally created product.
    ///
    /// A product whose id was previously deleted is lifted out of the Deleted
    /// ledger; re-recording an id already in Created replaces that entry.
    pub fn record_created(&self, product: Product) -> Result<(), CatalogError> {
        let _guard = self.lock()?;
        let id = product.id;

        let mut deleted: BTreeSet<ProductId> = self.load(DELETED_KEY)?;
        if deleted.remove(&id) {
            debug!(%id, "Created id was marked deleted, clearing");
            self.save(DELETED_KEY, &deleted)?;
        }

        let mut created: Vec<Product> = self.load(CREATED_KEY)?;
        match created.iter_mut().find(|p| p.id == id) {
            Some(existing) => *existing = product,
            None => created.push(product),
        }
        self.save(CREATED_KEY, &created)?;
        info!(%id, size = created.len(), "Recorded created");
        Ok(())
    }

    /// Upserts a full replacement record, last write wins.
    ///
    /// A missing rating is inherited from the record being replaced. Ids that
    /// were created locally are replaced in the Created ledger instead, and
    /// ids in the Deleted ledger are left alone.
    pub fn record_updated(&self, mut product: Product) -> Result<(), CatalogError> {
        let _guard = self.lock()?;
        let id = product.id;

        let deleted: BTreeSet<ProductId> = self.load(DELETED_KEY)?;
        if deleted.contains(&id) {
            warn!(%id, "Ignoring update of a locally deleted product");
            return Ok(());
        }

        let mut created: Vec<Product> = self.load(CREATED_KEY)?;
        if let Some(existing) = created.iter_mut().find(|p| p.id == id) {
            if product.rating.is_none() {
                product.rating = existing.rating;
            }
            *existing = product;
            self.save(CREATED_KEY, &created)?;
            info!(%id, "Recorded update of a locally created product");
            return Ok(());
        }

        let mut updated: BTreeMap<ProductId, Product> = self.load(UPDATED_KEY)?;
        if product.rating.is_none() {
            product.rating = updated.get(&id).and_then(|prior| prior.rating);
        }
        updated.insert(id, product);
        self.save(UPDATED_KEY, &updated)?;
        info!(%id, size = updated.len(), "Recorded updated");
        Ok(())
    }

    /// Marks `id` deleted and purges any Created or Updated entry for it.
    ///
    /// The purges are written before the Deleted entry, so a failed save
    /// never leaves the id both created and deleted.
    pub fn record_deleted(&self, id: ProductId) -> Result<(), CatalogError> {
        let _guard = self.lock()?;

        let mut created: Vec<Product> = self.load(CREATED_KEY)?;
        let before = created.len();
        created.retain(|p| p.id != id);
        if created.len() != before {
            self.save(CREATED_KEY, &created)?;
        }

        let mut updated: BTreeMap<ProductId, Product> = self.load(UPDATED_KEY)?;
        if updated.remove(&id).is_some() {
            self.save(UPDATED_KEY, &updated)?;
        }

        let mut deleted: BTreeSet<ProductId> = self.load(DELETED_KEY)?;
        if deleted.insert(id) {
            self.save(DELETED_KEY, &deleted)?;
        }

        info!(%id, size = deleted.len(), "Recorded deleted");
        Ok(())
    }

    /// Empties all three ledgers. Idempotent.
    pub fn clear_all(&self) -> Result<(), CatalogError> {
        let _guard = self.lock()?;
        self.store.remove(CREATED_KEY)?;
        self.store.remove(UPDATED_KEY)?;
        self.store.remove(DELETED_KEY)?;
        info!("Cleared local overrides");
        Ok(())
    }
}

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::ids::{ClockIds, IdGenerator};
use crate::ledger::{FileStore, KeyValueStore, LedgerSnapshot, OverrideLedgers};
use crate::model::{NewProduct, Product, ProductId, ProductUpdate};
use crate::reconcile::normalize_rating;
use crate::remote::{CatalogApi, HttpCatalogClient};

/// Result of a best-effort write.
///
/// The public `*_locally` operations only hand back `product`; the
/// `*_with_outcome` variants also report whether the remote accepted the
/// write, so the presentation layer can show a warning when it did not.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome<T = Product> {
    /// The remote leg returned 2xx.
    pub remote_confirmed: bool,
    pub product: T,
}

/// The boundary the presentation layer talks to.
///
/// `CatalogService` is responsible for:
/// - **Reads**: fetching the remote snapshot and overlaying the ledgers on it.
///   Remote failures propagate unchanged and are never retried.
/// - **Writes**: attempting the remote mutation, then recording local intent
///   whether or not the remote leg succeeded.
///
/// # Example
///
/// ```no_run
/// use catalog_overlay::config::CatalogConfig;
/// use catalog_overlay::lifecycle::CatalogService;
/// use catalog_overlay::model::ProductId;
///
/// # async fn run() -> Result<(), catalog_overlay::error::CatalogError> {
/// let service = CatalogService::from_config(&CatalogConfig::from_env()?)?;
///
/// let products = service.list_effective_products().await?;
/// service.delete_product_locally(ProductId(1)).await?;
/// assert!(service
///     .list_effective_products()
///     .await?
///     .iter()
///     .all(|p| p.id != ProductId(1)));
/// # let _ = products;
/// # Ok(())
/// # }
/// ```
pub struct CatalogService<A: CatalogApi, S: KeyValueStore> {
    api: A,
    ledgers: OverrideLedgers<S>,
    ids: Arc<dyn IdGenerator>,
}

impl CatalogService<HttpCatalogClient, FileStore> {
    /// Production wiring: HTTP client, file-backed ledgers, clock-based ids.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let ids: Arc<dyn IdGenerator> = Arc::new(ClockIds::new());
        let api = HttpCatalogClient::new(&config.base_url, config.request_timeout(), ids.clone())?;
        let store = FileStore::open(&config.storage_dir)?;
        info!(
            base_url = %config.base_url,
            storage_dir = %config.storage_dir.display(),
            "Catalog service ready"
        );
        Ok(Self::new(api, store, ids))
    }
}

impl<A: CatalogApi, S: KeyValueStore> CatalogService<A, S> {
    /// # Arguments
    /// * `api` - Remote catalog client
    /// * `store` - Durable storage for the ledgers
    /// * `ids` - Id source for products created while the remote is down;
    ///   share it with the client so both draw from one sequence
    pub fn new(api: A, store: S, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            api,
            ledgers: OverrideLedgers::new(store),
            ids,
        }
    }

    pub fn ledgers(&self) -> &OverrideLedgers<S> {
        &self.ledgers
    }

    /// Remote snapshot with the ledgers overlaid.
    #[instrument(skip(self))]
    pub async fn list_effective_products(&self) -> Result<Vec<Product>, CatalogError> {
        let remote = self.api.list_products().await?;
        let effective = self.ledgers.reconcile(remote);
        debug!(count = effective.len(), "Reconciled snapshot");
        Ok(effective)
    }

    /// One product as the list view would show it.
    #[instrument(skip(self))]
    pub async fn get_effective_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.lookup(id).await.map(normalize_rating)
    }

    /// Like [`get_effective_product`](Self::get_effective_product) but without
    /// rating normalization, so an absent rating can still be inherited later.
    async fn lookup(&self, id: ProductId) -> Result<Product, CatalogError> {
        let LedgerSnapshot {
            created,
            mut updated,
            deleted,
        } = self.ledgers.snapshot();

        if deleted.contains(&id) {
            return Err(CatalogError::NotFound(id));
        }
        if let Some(product) = created.into_iter().find(|p| p.id == id) {
            return Ok(product);
        }

        match (self.api.get_product(id).await, updated.remove(&id)) {
            (Ok(remote), Some(mut replacement)) => {
                if replacement.rating.is_none() {
                    replacement.rating = remote.rating;
                }
                Ok(replacement)
            }
            (Ok(remote), None) => Ok(remote),
            (Err(e), Some(replacement)) => {
                debug!(%id, error = %e, "Remote lookup failed, using local update");
                Ok(replacement)
            }
            (Err(e), None) => Err(e),
        }
    }

    /// Creates a product. Always succeeds locally unless storage fails.
    pub async fn create_product_locally(
        &self,
        fields: NewProduct,
    ) -> Result<Product, CatalogError> {
        self.create_with_outcome(fields).await.map(|o| o.product)
    }

    #[instrument(skip(self, fields), fields(title = %fields.title))]
    pub async fn create_with_outcome(
        &self,
        fields: NewProduct,
    ) -> Result<WriteOutcome, CatalogError> {
        let (product, remote_confirmed) = match self.api.create_product(&fields).await {
            Ok(product) => (product, true),
            Err(e) => {
                warn!(error = %e, "Remote create failed, keeping product locally");
                (Product::from_new(self.ids.next_id(), &fields), false)
            }
        };

        self.ledgers.record_created(product.clone())?;
        info!(id = %product.id, remote_confirmed, "Created");
        Ok(WriteOutcome {
            remote_confirmed,
            product: normalize_rating(product),
        })
    }

    /// Applies a partial update over the current effective product.
    ///
    /// Fails with the lookup error when that product cannot be loaded and
    /// `fields` does not describe a complete record. Otherwise it succeeds
    /// locally unless the product was deleted locally or storage fails.
    pub async fn update_product_locally(
        &self,
        id: ProductId,
        fields: ProductUpdate,
    ) -> Result<Product, CatalogError> {
        self.update_with_outcome(id, fields).await.map(|o| o.product)
    }

    #[instrument(skip(self, fields))]
    pub async fn update_with_outcome(
        &self,
        id: ProductId,
        fields: ProductUpdate,
    ) -> Result<WriteOutcome, CatalogError> {
        if self.ledgers.deleted().contains(&id) {
            return Err(CatalogError::NotFound(id));
        }

        // A partial update is only ever recorded over a known base record
        let base = match self.lookup(id).await {
            Ok(product) => product,
            Err(e) => match fields.to_product(id) {
                Some(product) => {
                    debug!(error = %e, "No base record, update supplies every field");
                    product
                }
                None => {
                    warn!(error = %e, "No base record for a partial update");
                    return Err(e);
                }
            },
        };

        let mut assembled = base;
        assembled.apply(&fields);

        let (product, remote_confirmed) = match self.api.update_product(id, &fields).await {
            Ok(echo) => (overlay_echo(assembled, &fields, echo), true),
            Err(e) => {
                warn!(error = %e, "Remote update failed, keeping update locally");
                (assembled, false)
            }
        };

        self.ledgers.record_updated(product.clone())?;
        info!(remote_confirmed, "Updated");
        Ok(WriteOutcome {
            remote_confirmed,
            product: normalize_rating(product),
        })
    }

    /// Deletes a product. Remote failure is ignored.
    pub async fn delete_product_locally(&self, id: ProductId) -> Result<(), CatalogError> {
        self.delete_with_outcome(id).await.map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn delete_with_outcome(
        &self,
        id: ProductId,
    ) -> Result<WriteOutcome<ProductId>, CatalogError> {
        let remote_confirmed = match self.api.delete_product(id).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Remote delete failed, deleting locally");
                false
            }
        };

        self.ledgers.record_deleted(id)?;
        info!(remote_confirmed, "Deleted");
        Ok(WriteOutcome {
            remote_confirmed,
            product: id,
        })
    }

    /// Drops every local override.
    pub fn reset_local_state(&self) -> Result<(), CatalogError> {
        self.ledgers.clear_all()
    }
}

/// Takes the server's version of each submitted field; unsubmitted fields keep
/// the base record's values.
fn overlay_echo(mut assembled: Product, fields: &ProductUpdate, echo: Product) -> Product {
    let echoed = ProductUpdate {
        title: fields.title.as_ref().map(|_| echo.title.clone()),
        price: fields.price.map(|_| echo.price),
        description: fields.description.as_ref().map(|_| echo.description.clone()),
        category: fields.category.as_ref().map(|_| echo.category.clone()),
        image: fields.image.as_ref().map(|_| echo.image.clone()),
    };
    assembled.apply(&echoed);
    if echo.rating.is_some() {
        assembled.rating = echo.rating;
    }
    assembled
}

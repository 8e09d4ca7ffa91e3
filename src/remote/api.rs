//! # CatalogApi Trait
//!
//! The operations of the remote catalog endpoint, independent of transport.
//! [`HttpCatalogClient`](super::HttpCatalogClient) talks to the real backend;
//! [`MockCatalogClient`](super::mock::MockCatalogClient) replays expectations in tests.
use async_trait::async_trait;

use crate::error::CatalogError;
use crate::model::{NewProduct, Product, ProductId, ProductUpdate};

/// Remote catalog operations.
///
/// None of these touch the local ledgers. Every failure is reported as a
/// [`CatalogError::NotFound`] (HTTP 404 on single-item routes) or
/// [`CatalogError::RemoteUnavailable`] (everything else).
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /` - the full remote snapshot.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// `GET /{id}`
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// `POST /` - the backend accepts but does not persist the write.
    ///
    /// The returned product has every field populated (echoed value first,
    /// submitted value second) and carries a locally synthesized id in place
    /// of whatever the backend assigned.
    async fn create_product(&self, fields: &NewProduct) -> Result<Product, CatalogError>;

    /// `PUT /{id}` with only the supplied fields.
    async fn update_product(
        &self,
        id: ProductId,
        fields: &ProductUpdate,
    ) -> Result<Product, CatalogError>;

    /// `DELETE /{id}`
    async fn delete_product(&self, id: ProductId) -> Result<Product, CatalogError>;
}

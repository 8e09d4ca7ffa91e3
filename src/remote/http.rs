//! # HTTP Catalog Client
//!
//! reqwest-backed [`CatalogApi`] against a REST product endpoint.
//!
//! Write endpoints of the backend echo back whatever subset of fields they
//! feel like (sometimes nothing, sometimes `null`). [`Echo`] captures that
//! subset and is laid over the submitted input, so callers always get a
//! complete [`Product`].
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::CatalogApi;
use crate::error::CatalogError;
use crate::ids::IdGenerator;
use crate::model::{NewProduct, Product, ProductId, ProductUpdate, Rating};

/// Client for the remote product endpoint.
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: String,
    ids: Arc<dyn IdGenerator>,
}

impl HttpCatalogClient {
    /// # Arguments
    /// * `base_url` - Collection URL, e.g. `https://fakestoreapi.com/products`
    /// * `timeout` - Per-request timeout
    /// * `ids` - Generator for the ids of created products
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            ids,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: ProductId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Maps non-2xx statuses to typed errors. 404 becomes `NotFound` only on
    /// single-item routes (`id` is `Some`).
    async fn ensure_success(
        response: Response,
        id: Option<ProductId>,
    ) -> Result<Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), %body, "Remote returned an error status");

        match (status, id) {
            (StatusCode::NOT_FOUND, Some(id)) => Err(CatalogError::NotFound(id)),
            _ => Err(CatalogError::RemoteUnavailable(format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            ))),
        }
    }

    async fn read_echo(response: Response) -> Result<Echo, CatalogError> {
        let body = response.bytes().await?;
        Echo::decode(&body)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        debug!("Sending request");
        let response = self.client.get(&self.base_url).send().await?;
        let response = Self::ensure_success(response, None).await?;
        let products: Vec<Product> = response.json().await?;
        debug!(count = products.len(), "Fetched remote snapshot");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        debug!("Sending request");
        let response = self.client.get(self.item_url(id)).send().await?;
        let response = Self::ensure_success(response, Some(id)).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, fields))]
    async fn create_product(&self, fields: &NewProduct) -> Result<Product, CatalogError> {
        debug!(?fields, "Sending request");
        let response = self
            .client
            .post(&self.base_url)
            .json(fields)
            .send()
            .await?;
        let response = Self::ensure_success(response, None).await?;
        let echo = Self::read_echo(response).await?;

        let id = self.ids.next_id();
        debug!(%id, "Assigned local id to created product");
        Ok(echo.patch_over(Product::from_new(id, fields)))
    }

    #[instrument(skip(self, fields))]
    async fn update_product(
        &self,
        id: ProductId,
        fields: &ProductUpdate,
    ) -> Result<Product, CatalogError> {
        debug!(?fields, "Sending request");
        let response = self
            .client
            .put(self.item_url(id))
            .json(fields)
            .send()
            .await?;
        let response = Self::ensure_success(response, Some(id)).await?;
        let echo = Self::read_echo(response).await?;

        let mut submitted = Product::new(id.0, "", 0.0);
        submitted.apply(fields);
        Ok(echo.patch_over(submitted))
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        debug!("Sending request");
        let response = self.client.delete(self.item_url(id)).send().await?;
        let response = Self::ensure_success(response, Some(id)).await?;
        let echo = Self::read_echo(response).await?;
        Ok(echo.patch_over(Product::new(id.0, "", 0.0)))
    }
}

/// Whatever subset of product fields a write endpoint echoed back.
/// The echoed id is deliberately not captured.
#[derive(Debug, Default, Deserialize)]
struct Echo {
    title: Option<String>,
    price: Option<f64>,
    description: Option<String>,
    category: Option<String>,
    image: Option<String>,
    rating: Option<Rating>,
}

impl Echo {
    /// Empty bodies and `null` decode to an empty echo.
    fn decode(body: &[u8]) -> Result<Self, CatalogError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice::<Option<Self>>(body)
            .map(Option::unwrap_or_default)
            .map_err(|e| CatalogError::RemoteUnavailable(format!("invalid response body: {e}")))
    }

    /// Echoed fields win; everything else comes from `fallback`.
    fn patch_over(self, fallback: Product) -> Product {
        Product {
            id: fallback.id,
            title: self.title.unwrap_or(fallback.title),
            price: self.price.unwrap_or(fallback.price),
            description: self.description.unwrap_or(fallback.description),
            category: self.category.unwrap_or(fallback.category),
            image: self.image.unwrap_or(fallback.image),
            rating: self.rating.or(fallback.rating),
        }
    }
}

//! Represents a product in the catalog.
//!
//! # Wire Format
//! The same shape is used for remote responses and for the locally stored
//! ledgers, so a `Product` round-trips through both without conversion:
//!
//! ```json
//! { "id": 1, "title": "...", "price": 10.5, "description": "...",
//!   "category": "...", "image": "https://...", "rating": { "rate": 3.9, "count": 120 } }
//! ```
//!
//! `rating` may be missing from any source. Products leaving the
//! [`reconcile`](crate::reconcile) step always carry one.
use serde::{Deserialize, Serialize};

use std::fmt::Display;

use crate::error::CatalogError;

/// Image shown for products that were created or echoed without one.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300";

fn placeholder_image() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

/// Type-safe identifier for Products.
///
/// Serialized as a bare number, and as a decimal string when used as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Aggregate customer rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "placeholder_image")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Product {
    /// Creates a new Product without a rating.
    ///
    /// # Arguments
    /// * `id` - Remote id, or one synthesized by an [`IdGenerator`](crate::ids::IdGenerator)
    /// * `title` - Display title
    /// * `price` - Unit price
    pub fn new(id: u64, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: ProductId(id),
            title: title.into(),
            price,
            description: String::new(),
            category: String::new(),
            image: placeholder_image(),
            rating: None,
        }
    }

    /// Builds a product from creation fields under a locally synthesized id.
    pub fn from_new(id: ProductId, fields: &NewProduct) -> Self {
        Self {
            id,
            title: fields.title.clone(),
            price: fields.price,
            description: fields.description.clone(),
            category: fields.category.clone(),
            image: fields.image.clone().unwrap_or_else(placeholder_image),
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Overwrites every field present in `update`, leaving the rest alone.
    pub fn apply(&mut self, update: &ProductUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(category) = &update.category {
            self.category = category.clone();
        }
        if let Some(image) = &update.image {
            self.image = image.clone();
        }
    }
}

/// Fields submitted when creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewProduct {
    /// Form-level checks for the presentation layer. The core never calls this.
    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_title(&self.title)?;
        validate_price(self.price)
    }
}

// DTOs for Product updates. Only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductUpdate {
    /// The full record this update describes, if it supplies every field.
    pub fn to_product(&self, id: ProductId) -> Option<Product> {
        Some(Product {
            id,
            title: self.title.clone()?,
            price: self.price?,
            description: self.description.clone()?,
            category: self.category.clone()?,
            image: self.image.clone()?,
            rating: None,
        })
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), CatalogError> {
    if title.trim().is_empty() {
        return Err(CatalogError::Validation("title must not be empty".into()));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), CatalogError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CatalogError::Validation(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

//! # Mock Catalog & Testing Guide
//!
//! [`MockCatalog`] hands out a [`MockCatalogClient`] that implements
//! [`CatalogApi`] entirely in memory. Each call pops the next queued
//! expectation and returns its canned response, which makes remote failures
//! (timeouts, 5xx, 404) trivial to inject.
//!
//! | Feature | MockCatalog | HTTP fake server |
//! |---------|-------------|------------------|
//! | **Speed** | Instant | Binds a socket per test |
//! | **Covers** | Service logic around the client | Status mapping, wire format |
//! | **Error Injection** | `return_err` | Server-side flags |
//!
//! ```rust
//! use catalog_overlay::error::CatalogError;
//! use catalog_overlay::model::{Product, ProductId};
//! use catalog_overlay::remote::{mock::MockCatalog, CatalogApi};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockCatalog::new();
//!     mock.expect_list().return_ok(vec![Product::new(1, "A", 10.0)]);
//!     mock.expect_get(ProductId(2))
//!         .return_err(CatalogError::NotFound(ProductId(2)));
//!
//!     let client = mock.client();
//!     assert_eq!(client.list_products().await.unwrap().len(), 1);
//!     assert!(client.get_product(ProductId(2)).await.is_err());
//!
//!     mock.verify(); // Ensures all expectations were met
//! }
//! ```
//!
//! Calls are matched strictly in order. A call that does not match the next
//! expectation (wrong operation or wrong id) panics.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::CatalogApi;
use crate::error::CatalogError;
use crate::model::{NewProduct, Product, ProductId, ProductUpdate};

enum Expectation {
    List {
        response: Result<Vec<Product>, CatalogError>,
    },
    Get {
        id: ProductId,
        response: Result<Product, CatalogError>,
    },
    Create {
        response: Result<Product, CatalogError>,
    },
    Update {
        id: ProductId,
        response: Result<Product, CatalogError>,
    },
    Delete {
        id: ProductId,
        response: Result<Product, CatalogError>,
    },
}

impl Expectation {
    fn describe(&self) -> String {
        match self {
            Expectation::List { .. } => "list".to_string(),
            Expectation::Get { id, .. } => format!("get({id})"),
            Expectation::Create { .. } => "create".to_string(),
            Expectation::Update { id, .. } => format!("update({id})"),
            Expectation::Delete { id, .. } => format!("delete({id})"),
        }
    }
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

/// Expectation queue plus the client that drains it.
#[derive(Default)]
pub struct MockCatalog {
    expectations: Queue,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a client sharing this mock's expectation queue.
    pub fn client(&self) -> MockCatalogClient {
        MockCatalogClient {
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<Vec<Product>> {
        ExpectationBuilder::new(&self.expectations, |response| Expectation::List { response })
    }

    pub fn expect_get(&mut self, id: ProductId) -> ExpectationBuilder<Product> {
        ExpectationBuilder::new(&self.expectations, move |response| Expectation::Get {
            id,
            response,
        })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<Product> {
        ExpectationBuilder::new(&self.expectations, |response| Expectation::Create { response })
    }

    pub fn expect_update(&mut self, id: ProductId) -> ExpectationBuilder<Product> {
        ExpectationBuilder::new(&self.expectations, move |response| Expectation::Update {
            id,
            response,
        })
    }

    pub fn expect_delete(&mut self, id: ProductId) -> ExpectationBuilder<Product> {
        ExpectationBuilder::new(&self.expectations, move |response| Expectation::Delete {
            id,
            response,
        })
    }

    /// Number of expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.expectations.lock().unwrap().len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            let pending: Vec<String> = exps.iter().map(Expectation::describe).collect();
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                exps.len(),
                pending
            );
        }
    }
}

/// Builder that queues one expectation with its response.
pub struct ExpectationBuilder<T> {
    expectations: Queue,
    make: Box<dyn FnOnce(Result<T, CatalogError>) -> Expectation + Send>,
}

impl<T> ExpectationBuilder<T> {
    fn new(
        expectations: &Queue,
        make: impl FnOnce(Result<T, CatalogError>) -> Expectation + Send + 'static,
    ) -> Self {
        Self {
            expectations: expectations.clone(),
            make: Box::new(make),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: CatalogError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, CatalogError>) {
        let expectation = (self.make)(response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

/// [`CatalogApi`] implementation that replays a [`MockCatalog`]'s expectations.
#[derive(Clone)]
pub struct MockCatalogClient {
    expectations: Queue,
}

impl MockCatalogClient {
    fn next(&self, call: &str) -> Expectation {
        self.expectations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("Unexpected call {call}: no expectations left"))
    }
}

#[async_trait]
impl CatalogApi for MockCatalogClient {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        match self.next("list") {
            Expectation::List { response } => response,
            other => panic!("Expected {}, got list", other.describe()),
        }
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        match self.next(&format!("get({id})")) {
            Expectation::Get { id: expected, response } if expected == id => response,
            other => panic!("Expected {}, got get({id})", other.describe()),
        }
    }

    async fn create_product(&self, _fields: &NewProduct) -> Result<Product, CatalogError> {
        match self.next("create") {
            Expectation::Create { response } => response,
            other => panic!("Expected {}, got create", other.describe()),
        }
    }

    async fn update_product(
        &self,
        id: ProductId,
        _fields: &ProductUpdate,
    ) -> Result<Product, CatalogError> {
        match self.next(&format!("update({id})")) {
            Expectation::Update { id: expected, response } if expected == id => response,
            other => panic!("Expected {}, got update({id})", other.describe()),
        }
    }

    async fn delete_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        match self.next(&format!("delete({id})")) {
            Expectation::Delete { id: expected, response } if expected == id => response,
            other => panic!("Expected {}, got delete({id})", other.describe()),
        }
    }
}

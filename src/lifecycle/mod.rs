//! # Service Lifecycle & Wiring
//!
//! Individual pieces of the catalog layer are simple. **Wiring them together**
//! is what this module handles:
//!
//! 1. **Construction** - pair a [`CatalogApi`](crate::remote::CatalogApi) with a
//!    [`KeyValueStore`](crate::ledger::KeyValueStore) and an id source
//! 2. **Configuration** - [`CatalogService::from_config`] builds the production
//!    stack from a [`CatalogConfig`](crate::config::CatalogConfig)
//! 3. **Observability** - [`setup_tracing`] for binaries that want log output
//!
//! ## Swapping the Stack
//!
//! Every collaborator is injected, so tests build the same service over
//! in-memory parts:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use catalog_overlay::ids::SequentialIds;
//! use catalog_overlay::ledger::InMemoryStore;
//! use catalog_overlay::lifecycle::CatalogService;
//! use catalog_overlay::model::Product;
//! use catalog_overlay::remote::mock::MockCatalog;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockCatalog::new();
//!     mock.expect_list().return_ok(vec![Product::new(1, "Backpack", 109.95)]);
//!
//!     let service = CatalogService::new(
//!         mock.client(),
//!         InMemoryStore::new(),
//!         Arc::new(SequentialIds::starting_at(1_000)),
//!     );
//!     let products = service.list_effective_products().await.unwrap();
//!     assert_eq!(products[0].rating.unwrap().count, 0);
//!
//!     mock.verify();
//! }
//! ```

pub mod catalog;
pub mod tracing;

pub use self::catalog::{CatalogService, WriteOutcome};
pub use self::tracing::setup_tracing;

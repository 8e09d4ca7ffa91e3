//! # Catalog Overlay
//!
//! > **Local overrides for a remote product catalog that does not keep your writes.**
//!
//! The remote catalog accepts create, update and delete requests and answers
//! 2xx, but the next listing shows the original data again. This crate keeps
//! what the operator did in three durable ledgers and overlays them on every
//! remote snapshot, so the dashboard shows the operator's intent.
//!
//! ## 🏗️ Design Philosophy
//!
//! - **Remote writes are best effort**: a write is attempted remotely, then
//!   recorded locally whether or not the remote accepted it.
//! - **Remote reads are authoritative input**: a failed listing is reported to
//!   the caller. No cached snapshot is served in its place.
//! - **Reconciliation is pure**: [`reconcile::reconcile`] is a deterministic
//!   function of the remote snapshot and a [`LedgerSnapshot`](ledger::LedgerSnapshot).
//!
//! ## 🚀 Core Concepts
//!
//! ### The Three Ledgers
//! - **Created**: products that exist only locally, in creation order.
//! - **Updated**: full replacement records keyed by id, last write wins.
//! - **Deleted**: ids to suppress. Deletion purges the id from the other two.
//!
//! ### The Effective Catalog
//! The remote snapshot minus Deleted, with Updated entries replacing their
//! remote counterparts in place, followed by the Created entries. Every
//! product in it carries a rating (`{rate: 0, count: 0}` when no source has
//! one).
//!
//! ### Mocking
//! Service logic is tested against [`MockCatalog`](remote::mock::MockCatalog),
//! an expectation queue implementing [`CatalogApi`](remote::CatalogApi).
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Boundary ([`lifecycle`])
//! - **Role**: the operations the presentation layer calls, and the wiring
//!   that builds them from configuration.
//! - **Key items**: [`CatalogService`](lifecycle::CatalogService),
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 2. The Ledgers ([`ledger`]) and the Merge ([`reconcile`])
//! - **Role**: durable local intent and the overlay rule.
//! - **Key items**: [`OverrideLedgers`](ledger::OverrideLedgers),
//!   [`FileStore`](ledger::FileStore).
//!
//! ### 3. The Remote ([`remote`])
//! - **Role**: typed access to the product endpoint.
//! - **Key items**: [`HttpCatalogClient`](remote::HttpCatalogClient).
//!
//! ### 4. Shared Pieces ([`model`], [`error`], [`ids`], [`config`])
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! cargo test
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod reconcile;
pub mod remote;

//! Durable local override ledgers.
//!
//! # Main Components
//!
//! - [`KeyValueStore`] - The storage seam. Production binds it to [`FileStore`],
//!   tests to [`InMemoryStore`].
//! - [`OverrideLedgers`] - The Created, Updated and Deleted ledgers plus the
//!   operations that record local intent into them.
//! - [`LedgerSnapshot`] - A value copy of all three ledgers, the input to
//!   [`reconcile`](crate::reconcile::reconcile).

pub mod file;
pub mod ledgers;
pub mod memory;
pub mod store;

pub use file::FileStore;
pub use ledgers::{LedgerSnapshot, OverrideLedgers};
pub use memory::InMemoryStore;
pub use store::{KeyValueStore, StoreError};

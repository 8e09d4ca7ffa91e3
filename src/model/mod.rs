//! Catalog data structures shared by the remote client and the ledgers.

pub mod product;

pub use product::*;

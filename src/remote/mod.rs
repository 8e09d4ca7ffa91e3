//! Remote Catalog Client: typed wrappers around the product endpoint.

pub mod api;
pub mod http;
pub mod mock;

pub use api::*;
pub use http::*;

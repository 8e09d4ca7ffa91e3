//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a `tracing` subscriber for binaries embedding the
//! catalog layer. The library itself only emits events; it never installs a
//! subscriber on its own.
//!
//! ## Configuration
//!
//! Log levels come from the `RUST_LOG` environment variable. Output uses the
//! compact format without module prefixes (`with_target(false)`), so span
//! names carry the context:
//!
//! ```bash
//! # Writes, remote fallbacks and ledger sizes
//! RUST_LOG=info
//!
//! # Also request payloads, reconcile counts and corrupt-ledger recovery
//! RUST_LOG=debug
//!
//! # Only the ledger layer
//! RUST_LOG=catalog_overlay::ledger=debug
//! ```
//!
//! ## What Gets Traced
//!
//! - **Remote calls**: one span per [`CatalogApi`](crate::remote::CatalogApi)
//!   operation, with non-2xx statuses logged at `warn`
//! - **Fallbacks**: a `warn` event whenever a write is kept locally because
//!   the remote leg failed
//! - **Ledger writes**: `info` events with the id and the ledger size
//!
//! A typical offline create followed by a list looks like:
//!
//! ```text
//! WARN create_with_outcome{title="Lamp"}: Remote create failed, keeping product locally error=Remote catalog unavailable: 503 Service Unavailable
//! INFO create_with_outcome{title="Lamp"}: Recorded created id=1718000000000 size=1
//! INFO create_with_outcome{title="Lamp"}: Created id=1718000000000 remote_confirmed=false
//! DEBUG list_effective_products: Reconciled snapshot count=21
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which makes it
/// safe to call from every test.
pub fn setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}

//! Integration tests for Oakline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p oakline-integration-tests
//!
//! # Include tests against a live Sanity project (SANITY_* env vars)
//! cargo test -p oakline-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Catalog operations over the fixture dataset
//! - `routes` - HTTP API and fragments through the full router
//! - `live` - Smoke tests against a real dataset (ignored by default)
//!
//! The fixture dataset in `tests/fixtures/dataset.ndjson` has the same shape
//! as a `sanity dataset export`, so every test runs against [`MemoryStore`].

use std::path::PathBuf;

use oakline_storefront::catalog::{Catalog, CatalogConfig};
use oakline_storefront::sanity::MemoryStore;
use oakline_storefront::state::AppState;

/// Low-stock threshold used by the fixture catalog.
pub const FIXTURE_LOW_STOCK_THRESHOLD: u32 = 5;

/// Path of the fixture dataset export.
#[must_use]
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/dataset.ndjson")
}

/// Load the fixture dataset.
///
/// # Panics
///
/// Panics if the fixture file is missing or malformed.
pub async fn fixture_store() -> MemoryStore {
    MemoryStore::load(&fixture_path())
        .await
        .unwrap_or_else(|e| panic!("Failed to load fixture dataset: {e}"))
}

/// A catalog over the fixture dataset.
pub async fn fixture_catalog() -> Catalog<MemoryStore> {
    Catalog::new(
        fixture_store().await,
        CatalogConfig {
            low_stock_threshold: FIXTURE_LOW_STOCK_THRESHOLD,
        },
    )
}

/// Application state over the fixture dataset.
pub async fn fixture_state() -> AppState<MemoryStore> {
    AppState::new(fixture_catalog().await)
}

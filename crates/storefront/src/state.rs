//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::sanity::SanityClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Generic over the content store so the same
/// router serves the live API and an in-memory dataset.
pub struct AppState<S = SanityClient> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    catalog: Catalog<S>,
}

// Manual impl: derive would require `S: Clone`
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> AppState<S> {
    /// Create a new application state.
    #[must_use]
    pub fn new(catalog: Catalog<S>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { catalog }),
        }
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog<S> {
        &self.inner.catalog
    }
}

//! Product query layer.
//!
//! [`Catalog`] runs the named queries in [`queries`] against any
//! [`ContentStore`] and deserializes the projected records. It is cheap to
//! clone and safe to share across tasks.

mod customers;
pub mod filters;
mod products;
pub mod queries;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

pub use filters::{FilterKey, FilterParams, SortOrder};

use crate::sanity::groq::Query;
use crate::sanity::{ContentStore, SanityError};

/// Catalog settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Stock at or below this (and above zero) counts as low.
    pub low_stock_threshold: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
        }
    }
}

/// Named, parameterized product queries over a content store.
pub struct Catalog<S> {
    store: Arc<S>,
    config: CatalogConfig,
}

// Manual impl: `S` itself need not be `Clone`
impl<S> Clone for Catalog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config,
        }
    }
}

impl<S: ContentStore> Catalog<S> {
    #[must_use]
    pub fn new(store: S, config: CatalogConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// The underlying content store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Run a list query. A `null` result is an empty list.
    async fn fetch_list<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, SanityError> {
        match self.store.fetch(query).await? {
            Value::Null => Ok(Vec::new()),
            value => {
                let records: Vec<T> = serde_json::from_value(value)?;
                debug!(count = records.len(), "Fetched records");
                Ok(records)
            }
        }
    }

    /// Run a single-document query. `null` means not found.
    async fn fetch_one<T: DeserializeOwned>(&self, query: &Query) -> Result<Option<T>, SanityError> {
        match self.store.fetch(query).await? {
            Value::Null => Ok(None),
            value => Ok(Some(serde_json::from_value(value)?)),
        }
    }
}

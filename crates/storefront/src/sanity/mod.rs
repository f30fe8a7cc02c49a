//! Sanity content store access.
//!
//! # Architecture
//!
//! - Queries are built as typed values ([`groq::Query`]) and rendered to GROQ
//! - Sanity is source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for query results (5 minute TTL by default)
//! - [`MemoryStore`] evaluates the same typed queries over a local dataset
//!   export, for offline use and tests
//!
//! # Example
//!
//! ```rust,ignore
//! use oakline_storefront::sanity::{ContentStore, SanityClient, groq::Query};
//!
//! let client = SanityClient::new(&config.sanity);
//! let result = client.fetch(&Query::documents("product")).await?;
//! ```

mod cache;
mod client;
pub mod groq;
mod memory;
pub mod types;

use std::future::Future;

pub use client::SanityClient;
pub use memory::MemoryStore;

use groq::Query;
use thiserror::Error;

/// A document store that can evaluate typed GROQ queries.
///
/// Implementations return the raw JSON `result` of the query: an array for
/// list queries, an object or `null` for single-document lookups.
pub trait ContentStore: Send + Sync + 'static {
    /// Evaluate a query.
    fn fetch(&self, query: &Query) -> impl Future<Output = Result<serde_json::Value, SanityError>> + Send;
}

/// Errors that can occur when querying the content store.
#[derive(Debug, Error)]
pub enum SanityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("Sanity API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description from the response body.
        message: String,
    },

    /// The store rejected the GROQ query.
    #[error("Query error: {0}")]
    Query(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Sanity.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A local dataset export could not be loaded.
    #[error("Dataset error: {0}")]
    Dataset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanity_error_display() {
        let err = SanityError::Api {
            status: 401,
            message: "Unauthorized - Session not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Sanity API error (401): Unauthorized - Session not found"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = SanityError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}

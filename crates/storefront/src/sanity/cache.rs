//! Cache keys for query results.

use super::groq::Query;

/// Cache key for a query result: the rendered GROQ plus its bound params.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    query: String,
    params: String,
}

impl CacheKey {
    #[must_use]
    pub fn from_query(query: &Query) -> Self {
        Self {
            query: query.render(),
            // Params is a BTreeMap, so serialization order is stable
            params: serde_json::to_string(query.params()).unwrap_or_default(),
        }
    }
}

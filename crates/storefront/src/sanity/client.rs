//! Sanity HTTP query API client.
//!
//! Caches query results using `moka` (5-minute TTL by default).

use std::sync::Arc;

use moka::future::Cache;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use super::cache::CacheKey;
use super::groq::Query;
use super::{ContentStore, SanityError};
use crate::config::{SanityConfig, bearer};

/// GET URLs longer than this are sent as POST instead.
const MAX_GET_URL_LENGTH: usize = 11264;

/// Successful query response body.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    ms: Option<u64>,
}

/// Error response body: `{"error": {"description": "...", "type": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

// =============================================================================
// SanityClient
// =============================================================================

/// Client for the Sanity HTTP query API.
///
/// Results are cached per rendered query and parameter set.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    endpoint: String,
    token: Option<SecretString>,
    cache: Option<Cache<CacheKey, Value>>,
}

impl SanityClient {
    /// Create a new query API client.
    #[must_use]
    pub fn new(config: &SanityConfig) -> Self {
        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(config.cache_capacity)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Self {
            inner: Arc::new(SanityClientInner {
                client: reqwest::Client::new(),
                endpoint: config.query_endpoint(),
                token: config.api_token.clone(),
                cache,
            }),
        }
    }

    /// Build the GET URL: `?query=<groq>&$name=<json>` for each parameter.
    fn query_url(&self, query: &Query) -> Result<Url, SanityError> {
        let mut url = Url::parse(&self.inner.endpoint)
            .map_err(|e| SanityError::Query(format!("invalid endpoint: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", &query.render());
            for (name, value) in query.params() {
                pairs.append_pair(&format!("${name}"), &value.to_string());
            }
        }
        Ok(url)
    }

    /// Execute a query against the HTTP API.
    async fn execute(&self, query: &Query) -> Result<Value, SanityError> {
        let url = self.query_url(query)?;

        let request = if url.as_str().len() > MAX_GET_URL_LENGTH {
            debug!(length = url.as_str().len(), "Query too long for GET, using POST");
            self.inner.client.post(&self.inner.endpoint).json(&json!({
                "query": query.render(),
                "params": query.params(),
            }))
        } else {
            self.inner.client.get(url)
        };

        let request = match &self.inner.token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, bearer(token)),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SanityError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Sanity API returned non-success status"
            );
            return Err(error_from_body(status, &response_text));
        }

        let response: QueryResponse = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Sanity query response"
                );
                return Err(SanityError::Parse(e));
            }
        };

        debug!(server_ms = ?response.ms, "Query executed");
        Ok(response.result)
    }
}

impl ContentStore for SanityClient {
    #[instrument(skip_all, fields(query = %query))]
    async fn fetch(&self, query: &Query) -> Result<Value, SanityError> {
        let Some(cache) = &self.inner.cache else {
            return self.execute(query).await;
        };

        let key = CacheKey::from_query(query);
        if let Some(result) = cache.get(&key).await {
            debug!("Cache hit for query");
            return Ok(result);
        }

        let result = self.execute(query).await?;
        cache.insert(key, result.clone()).await;
        Ok(result)
    }
}

/// Map an error response to `SanityError`.
///
/// A 400 carrying a description is a rejected query; anything else is an
/// API error with the best message available.
fn error_from_body(status: reqwest::StatusCode, body: &str) -> SanityError {
    let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
    let description = parsed
        .as_ref()
        .and_then(|r| r.error.description.clone())
        .or_else(|| parsed.as_ref().and_then(|r| r.error.kind.clone()));

    match description {
        Some(description) if status == reqwest::StatusCode::BAD_REQUEST => {
            SanityError::Query(description)
        }
        Some(message) => SanityError::Api {
            status: status.as_u16(),
            message,
        },
        None => SanityError::Api {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sanity::groq::{Condition, Param};

    fn client() -> SanityClient {
        SanityClient::new(&SanityConfig::new("a1b2c3d4", "production"))
    }

    #[test]
    fn test_query_url_encodes_query_and_params() {
        let query = Query::documents("product")
            .filter(Condition::eq("slug.current", Param("slug")))
            .param(Param("slug"), "oak-table")
            .first();

        let url = client().query_url(&query).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.host_str(), Some("a1b2c3d4.apicdn.sanity.io"));
        assert_eq!(
            pairs,
            vec![
                (
                    "query".to_string(),
                    "*[_type == \"product\" && slug.current == $slug][0]".to_string()
                ),
                ("$slug".to_string(), "\"oak-table\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_error_from_body_query_error() {
        let body = r#"{"error":{"description":"expected ']' following expression","type":"queryParseError"}}"#;
        let err = error_from_body(reqwest::StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, SanityError::Query(msg) if msg.contains("expected ']'")));
    }

    #[test]
    fn test_error_from_body_api_error() {
        let body = r#"{"error":{"description":"Session not found","type":"httpUnauthorized"}}"#;
        let err = error_from_body(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.to_string(), "Sanity API error (401): Session not found");
    }

    #[test]
    fn test_error_from_body_unstructured() {
        let err = error_from_body(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "Sanity API error (502): upstream down");
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let mut config = SanityConfig::new("a1b2c3d4", "production");
        config.cache_ttl = std::time::Duration::ZERO;
        assert!(SanityClient::new(&config).inner.cache.is_none());
        assert!(client().inner.cache.is_some());
    }
}

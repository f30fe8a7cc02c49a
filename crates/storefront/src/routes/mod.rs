//! HTTP route handlers for the storefront catalog API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (content store round trip)
//!
//! # Products
//! GET  /api/products                    - All products
//! GET  /api/products/featured           - Featured carousel
//! GET  /api/products/filter             - Filtered listing (?categorySlug, color, material,
//!                                         minPrice, maxPrice, searchQuery, inStock, sort)
//! GET  /api/products/search             - Relevance search (?q)
//! GET  /api/products/by-ids             - Cart resolution (?ids=a,b)
//! GET  /api/products/{slug}             - Product detail
//!
//! # Categories
//! GET  /api/categories/{slug}/products  - Category listing
//!
//! # Assistant
//! GET  /api/assistant/products          - Shopping assistant search
//!
//! # Fragments (HTMX)
//! GET  /fragments/filter-labels         - Filter label panel
//! ```

pub mod assistant;
pub mod categories;
pub mod fragments;
pub mod params;
pub mod products;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::trace::TraceLayer;

use crate::sanity::ContentStore;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes<S: ContentStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(products::index::<S>))
        .route("/featured", get(products::featured::<S>))
        .route("/filter", get(products::filter::<S>))
        .route("/search", get(products::search::<S>))
        .route("/by-ids", get(products::by_ids::<S>))
        .route("/{slug}", get(products::show::<S>))
}

/// Create the category routes router.
pub fn category_routes<S: ContentStore>() -> Router<AppState<S>> {
    Router::new().route("/{slug}/products", get(categories::products::<S>))
}

/// Create all catalog routes.
pub fn routes<S: ContentStore>() -> Router<AppState<S>> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/categories", category_routes())
        .route("/api/assistant/products", get(assistant::products::<S>))
        .route(fragments::FILTER_LABELS_PATH, get(fragments::filter_labels))
}

/// The complete application: health checks, catalog routes and request tracing.
pub fn app<S: ContentStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness::<S>))
        .merge(routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the content store does not answer.
async fn readiness<S: ContentStore>(State(state): State<AppState<S>>) -> StatusCode {
    match state.catalog().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

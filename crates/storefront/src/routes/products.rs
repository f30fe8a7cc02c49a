//! Product API handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use super::params::{FilterQuery, IdsQuery, SearchQuery};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::sanity::ContentStore;
use crate::sanity::types::{CartProduct, FeaturedProduct, FilteredProduct, ProductCard, ProductDetail};
use crate::state::AppState;

/// All products with full detail.
#[instrument(skip(state))]
pub async fn index<S: ContentStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<ProductDetail>>> {
    Ok(Json(state.catalog().all_products().await?))
}

/// Featured products for the homepage carousel.
#[instrument(skip(state))]
pub async fn featured<S: ContentStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<FeaturedProduct>>> {
    Ok(Json(state.catalog().featured_products().await?))
}

/// Filtered, sorted product listing.
#[instrument(skip(state))]
pub async fn filter<S: ContentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<FilteredProduct>>> {
    let filters = query.filters();
    let sort = query.sort();

    add_breadcrumb("catalog", "Filtered products", Some(&[("sort", sort.as_str())]));

    Ok(Json(state.catalog().filtered_products(&filters, sort).await?))
}

/// Relevance-ranked search.
#[instrument(skip(state))]
pub async fn search<S: ContentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductCard>>> {
    Ok(Json(state.catalog().search_products(&query.q).await?))
}

/// Resolve cart product ids.
#[instrument(skip(state))]
pub async fn by_ids<S: ContentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<CartProduct>>> {
    Ok(Json(state.catalog().products_by_ids(&query.ids()).await?))
}

/// Product detail by slug.
#[instrument(skip(state))]
pub async fn show<S: ContentStore>(
    State(state): State<AppState<S>>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    state
        .catalog()
        .product_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {slug}")))
}

//! Category API handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::Result;
use crate::sanity::ContentStore;
use crate::sanity::types::ProductCard;
use crate::state::AppState;

/// Products in a category. An unknown category is an empty list.
#[instrument(skip(state))]
pub async fn products<S: ContentStore>(
    State(state): State<AppState<S>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<ProductCard>>> {
    Ok(Json(state.catalog().products_by_category(&slug).await?))
}

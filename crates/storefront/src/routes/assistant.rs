//! Shopping assistant tool endpoint.
//!
//! Takes the same filter parameters as the product listing and returns at
//! most 20 products, ordered by name, with the fields a conversational agent
//! needs to describe them.

use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use super::params::FilterQuery;
use crate::error::Result;
use crate::sanity::ContentStore;
use crate::sanity::types::AssistantProduct;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn products<S: ContentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<AssistantProduct>>> {
    Ok(Json(state.catalog().assistant_search(&query.filters()).await?))
}

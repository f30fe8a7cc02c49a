//! HTML fragments for the product filter panel (HTMX).

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;
use tracing::instrument;

use super::params::FilterQuery;
use crate::components::FilterLabel;
use crate::error::{AppError, Result};

/// Where clear links point: this fragment, re-rendered without that filter.
pub const FILTER_LABELS_PATH: &str = "/fragments/filter-labels";

/// Filter label panel.
#[derive(Template, WebTemplate)]
#[template(path = "fragments/filter_labels.html")]
pub struct FilterLabelsTemplate {
    /// Pre-rendered labels.
    pub labels: Vec<String>,
}

/// Render one label per filter for the current query string.
#[instrument]
pub async fn filter_labels(Query(query): Query<FilterQuery>) -> Result<FilterLabelsTemplate> {
    let labels = FilterLabel::for_filters(&query.filters(), FILTER_LABELS_PATH)
        .iter()
        .map(Template::render)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| AppError::Internal(format!("Failed to render filter label: {e}")))?;

    Ok(FilterLabelsTemplate { labels })
}

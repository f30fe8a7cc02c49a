//! Query-string extraction for catalog routes.

use std::str::FromStr;

use oakline_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::catalog::{FilterParams, SortOrder};

/// Deserialize empty strings as `None`, parse everything else.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Checkbox-style flag: `true`, `1` and `on` are set, anything else is not.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(matches!(s.as_deref(), Some("true" | "1" | "on")))
}

/// Listing filter query parameters.
///
/// Keys follow the listing page URLs (`categorySlug`, `minPrice`, ...).
/// `q` and `category` are accepted as short forms.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    #[serde(default, alias = "category")]
    pub category_slug: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_price: Option<Decimal>,
    #[serde(default, alias = "q")]
    pub search_query: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub in_stock: bool,
    #[serde(default)]
    pub sort: String,
}

impl FilterQuery {
    /// The filter set these parameters describe.
    #[must_use]
    pub fn filters(&self) -> FilterParams {
        FilterParams::new()
            .with_category(self.category_slug.as_deref())
            .with_color(self.color.as_deref())
            .with_material(self.material.as_deref())
            .with_min_price(self.min_price)
            .with_max_price(self.max_price)
            .with_search(self.search_query.as_deref())
            .with_in_stock(self.in_stock)
    }

    #[must_use]
    pub fn sort(&self) -> SortOrder {
        SortOrder::parse(&self.sort)
    }
}

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Comma-separated product ids.
#[derive(Debug, Default, Deserialize)]
pub struct IdsQuery {
    #[serde(default)]
    pub ids: String,
}

impl IdsQuery {
    #[must_use]
    pub fn ids(&self) -> Vec<ProductId> {
        self.ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ProductId::new)
            .collect()
    }
}

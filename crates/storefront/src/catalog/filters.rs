//! Product listing filters and sort orders.
//!
//! Every filter is optional: an empty string, a zero price or `false` leaves
//! the corresponding clause out of the query entirely.

use core::fmt;

use rust_decimal::Decimal;

/// Identifies one filter of a [`FilterParams`] set.
///
/// The string form is the query-string key the listing pages use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Category,
    Color,
    Material,
    MinPrice,
    MaxPrice,
    Search,
    InStock,
}

impl FilterKey {
    /// Every key, in display order.
    pub const ALL: [Self; 7] = [
        Self::Search,
        Self::Category,
        Self::Color,
        Self::Material,
        Self::MinPrice,
        Self::MaxPrice,
        Self::InStock,
    ];

    /// Parse from a query-string key. Accepts the short aliases `q` and `category`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "categorySlug" | "category" => Some(Self::Category),
            "color" => Some(Self::Color),
            "material" => Some(Self::Material),
            "minPrice" => Some(Self::MinPrice),
            "maxPrice" => Some(Self::MaxPrice),
            "searchQuery" | "q" => Some(Self::Search),
            "inStock" => Some(Self::InStock),
            _ => None,
        }
    }

    /// Convert to the query-string key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "categorySlug",
            Self::Color => "color",
            Self::Material => "material",
            Self::MinPrice => "minPrice",
            Self::MaxPrice => "maxPrice",
            Self::Search => "searchQuery",
            Self::InStock => "inStock",
        }
    }

    /// Human-readable label for filter panels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Color => "Color",
            Self::Material => "Material",
            Self::MinPrice => "Min price",
            Self::MaxPrice => "Max price",
            Self::Search => "Search",
            Self::InStock => "In stock only",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
    /// Weighted text match, then name.
    Relevance,
}

impl SortOrder {
    /// Parse from URL parameter value. Unknown values fall back to name order.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-ascending" | "price_asc" => Self::PriceAsc,
            "price-descending" | "price_desc" => Self::PriceDesc,
            "relevance" => Self::Relevance,
            _ => Self::Name,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceAsc => "price-ascending",
            Self::PriceDesc => "price-descending",
            Self::Relevance => "relevance",
        }
    }
}

/// A caller-supplied filter set for product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    category_slug: Option<String>,
    color: Option<String>,
    material: Option<String>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    search_query: Option<String>,
    in_stock: bool,
}

/// The text as given, or `None` when it is blank.
fn non_empty(value: Option<impl Into<String>>) -> Option<String> {
    value.map(Into::into).filter(|s| !s.trim().is_empty())
}

/// Zero disables a price bound.
fn non_zero(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

impl FilterParams {
    /// No filters: matches every product.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(mut self, slug: Option<impl Into<String>>) -> Self {
        self.category_slug = non_empty(slug);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Option<impl Into<String>>) -> Self {
        self.color = non_empty(color);
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: Option<impl Into<String>>) -> Self {
        self.material = non_empty(material);
        self
    }

    #[must_use]
    pub fn with_min_price(mut self, price: Option<Decimal>) -> Self {
        self.min_price = non_zero(price);
        self
    }

    #[must_use]
    pub fn with_max_price(mut self, price: Option<Decimal>) -> Self {
        self.max_price = non_zero(price);
        self
    }

    #[must_use]
    pub fn with_search(mut self, query: Option<impl Into<String>>) -> Self {
        self.search_query = non_empty(query);
        self
    }

    #[must_use]
    pub const fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    #[must_use]
    pub fn category_slug(&self) -> Option<&str> {
        self.category_slug.as_deref()
    }

    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    #[must_use]
    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    #[must_use]
    pub const fn min_price(&self) -> Option<Decimal> {
        self.min_price
    }

    #[must_use]
    pub const fn max_price(&self) -> Option<Decimal> {
        self.max_price
    }

    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.in_stock
    }

    /// Whether the given filter currently restricts results.
    #[must_use]
    pub const fn is_active(&self, key: FilterKey) -> bool {
        match key {
            FilterKey::Category => self.category_slug.is_some(),
            FilterKey::Color => self.color.is_some(),
            FilterKey::Material => self.material.is_some(),
            FilterKey::MinPrice => self.min_price.is_some(),
            FilterKey::MaxPrice => self.max_price.is_some(),
            FilterKey::Search => self.search_query.is_some(),
            FilterKey::InStock => self.in_stock,
        }
    }

    /// Whether no filter is active.
    #[must_use]
    pub fn is_default(&self) -> bool {
        FilterKey::ALL.iter().all(|&key| !self.is_active(key))
    }

    /// Reset exactly one filter to its disabled value.
    pub fn clear(&mut self, key: FilterKey) {
        match key {
            FilterKey::Category => self.category_slug = None,
            FilterKey::Color => self.color = None,
            FilterKey::Material => self.material = None,
            FilterKey::MinPrice => self.min_price = None,
            FilterKey::MaxPrice => self.max_price = None,
            FilterKey::Search => self.search_query = None,
            FilterKey::InStock => self.in_stock = false,
        }
    }

    /// A copy with one filter cleared.
    #[must_use]
    pub fn without(&self, key: FilterKey) -> Self {
        let mut params = self.clone();
        params.clear(key);
        params
    }

    /// Active filters as `(key, value)` pairs, in [`FilterKey::ALL`] order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(FilterKey, String)> {
        FilterKey::ALL
            .iter()
            .filter_map(|&key| {
                let value = match key {
                    FilterKey::Category => self.category_slug.clone(),
                    FilterKey::Color => self.color.clone(),
                    FilterKey::Material => self.material.clone(),
                    FilterKey::MinPrice => self.min_price.map(|p| p.normalize().to_string()),
                    FilterKey::MaxPrice => self.max_price.map(|p| p.normalize().to_string()),
                    FilterKey::Search => self.search_query.clone(),
                    FilterKey::InStock => self.in_stock.then(|| "true".to_string()),
                }?;
                Some((key, value))
            })
            .collect()
    }

    /// URL query string for the active filters (no leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.pairs()
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_disable_filters() {
        let params = FilterParams::new()
            .with_category(Some("  "))
            .with_color(Some(""))
            .with_material(None::<String>)
            .with_min_price(Some(Decimal::ZERO))
            .with_max_price(Some(Decimal::ZERO))
            .with_search(Some(""));

        assert!(params.is_default());
        assert_eq!(params, FilterParams::new());
    }

    #[test]
    fn test_values_are_kept_verbatim() {
        let params = FilterParams::new()
            .with_category(Some("Living Room"))
            .with_color(Some(" walnut "))
            .with_material(Some("Oak\t"));

        assert_eq!(params.category_slug(), Some("Living Room"));
        assert_eq!(params.color(), Some(" walnut "));
        assert_eq!(params.material(), Some("Oak\t"));
    }

    #[test]
    fn test_clear_resets_exactly_one_filter() {
        let mut params = FilterParams::new()
            .with_color(Some("walnut"))
            .with_material(Some("oak"))
            .with_in_stock(true);

        params.clear(FilterKey::Material);

        assert!(!params.is_active(FilterKey::Material));
        assert!(params.is_active(FilterKey::Color));
        assert!(params.is_active(FilterKey::InStock));
    }

    #[test]
    fn test_query_string_uses_param_names() {
        let params = FilterParams::new()
            .with_category(Some("living-room"))
            .with_search(Some("mid century"))
            .with_min_price(Some(Decimal::new(9950, 2)))
            .with_in_stock(true);

        assert_eq!(
            params.to_query_string(),
            "searchQuery=mid%20century&categorySlug=living-room&minPrice=99.5&inStock=true"
        );
    }

    #[test]
    fn test_without_leaves_original_untouched() {
        let params = FilterParams::new().with_color(Some("walnut"));
        let cleared = params.without(FilterKey::Color);
        assert!(params.is_active(FilterKey::Color));
        assert!(cleared.is_default());
    }

    #[test]
    fn test_filter_key_parse() {
        for key in FilterKey::ALL {
            assert_eq!(FilterKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(FilterKey::parse("q"), Some(FilterKey::Search));
        assert_eq!(FilterKey::parse("category"), Some(FilterKey::Category));
        assert_eq!(FilterKey::parse("size"), None);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("price-ascending"), SortOrder::PriceAsc);
        assert_eq!(SortOrder::parse("price_desc"), SortOrder::PriceDesc);
        assert_eq!(SortOrder::parse("relevance"), SortOrder::Relevance);
        assert_eq!(SortOrder::parse(""), SortOrder::Name);
        assert_eq!(SortOrder::parse("bogus"), SortOrder::Name);
    }
}

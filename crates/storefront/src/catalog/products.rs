//! Product operations.

use oakline_core::ProductId;
use tracing::{debug, instrument};

use super::filters::{FilterParams, SortOrder};
use super::{Catalog, queries};
use crate::sanity::types::{
    AssistantProduct, CartProduct, FeaturedProduct, FilteredProduct, ProductCard, ProductDetail,
    StockReportEntry,
};
use crate::sanity::{ContentStore, SanityError};

impl<S: ContentStore> Catalog<S> {
    /// Every product with full detail, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self))]
    pub async fn all_products(&self) -> Result<Vec<ProductDetail>, SanityError> {
        self.fetch_list(&queries::all_products()).await
    }

    /// Up to six in-stock featured products.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<FeaturedProduct>, SanityError> {
        self.fetch_list(&queries::featured_products()).await
    }

    /// Products in a category, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self), fields(category = %category_slug))]
    pub async fn products_by_category(
        &self,
        category_slug: &str,
    ) -> Result<Vec<ProductCard>, SanityError> {
        self.fetch_list(&queries::products_by_category(category_slug))
            .await
    }

    /// Look up a product by slug. `Ok(None)` when no product has it.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<ProductDetail>, SanityError> {
        self.fetch_one(&queries::product_by_slug(slug)).await
    }

    /// Relevance-ranked search over name and description.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, term: &str) -> Result<Vec<ProductCard>, SanityError> {
        self.fetch_list(&queries::search_products(term)).await
    }

    /// Filtered product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self), fields(sort = sort.as_str()))]
    pub async fn filtered_products(
        &self,
        filters: &FilterParams,
        sort: SortOrder,
    ) -> Result<Vec<FilteredProduct>, SanityError> {
        self.fetch_list(&queries::filtered_products(filters, sort))
            .await
    }

    /// Resolve cart lines. Unknown ids are silently dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self), fields(count = ids.len()))]
    pub async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<CartProduct>, SanityError> {
        if ids.is_empty() {
            debug!("No ids requested, skipping round trip");
            return Ok(Vec::new());
        }
        self.fetch_list(&queries::products_by_ids(ids)).await
    }

    /// Products at or below the configured low-stock threshold, lowest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self), fields(threshold = self.config.low_stock_threshold))]
    pub async fn low_stock_products(&self) -> Result<Vec<StockReportEntry>, SanityError> {
        self.fetch_list(&queries::low_stock_products(self.config.low_stock_threshold))
            .await
    }

    /// Products with zero stock, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self))]
    pub async fn out_of_stock_products(&self) -> Result<Vec<StockReportEntry>, SanityError> {
        self.fetch_list(&queries::out_of_stock_products()).await
    }

    /// Shopping assistant search: at most 20 products, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self))]
    pub async fn assistant_search(
        &self,
        filters: &FilterParams,
    ) -> Result<Vec<AssistantProduct>, SanityError> {
        self.fetch_list(&queries::assistant_search(filters)).await
    }

    /// Check that the content store answers queries.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store request fails.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), SanityError> {
        self.store.fetch(&queries::ping()).await.map(|_| ())
    }
}

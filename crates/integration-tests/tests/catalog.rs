//! Catalog operations over the fixture dataset.
//!
//! Run with: cargo test -p oakline-integration-tests --test catalog

use oakline_core::{ProductId, StockLevel};
use oakline_integration_tests::{FIXTURE_LOW_STOCK_THRESHOLD, fixture_catalog};
use oakline_storefront::catalog::{FilterParams, SortOrder};
use oakline_storefront::sanity::types::FilteredProduct;
use rust_decimal::Decimal;

fn names<'a>(names: impl IntoIterator<Item = &'a Option<String>>) -> Vec<&'a str> {
    names
        .into_iter()
        .map(|name| name.as_deref().unwrap_or_default())
        .collect()
}

fn sorted_ids(products: &[FilteredProduct]) -> Vec<&str> {
    let mut ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    ids.sort_unstable();
    ids
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn test_all_products_by_name() {
    let catalog = fixture_catalog().await;
    let products = catalog.all_products().await.unwrap();

    assert_eq!(
        names(products.iter().map(|p| &p.name)),
        [
            "Arc Floor Lamp",
            "Ash Bench",
            "Bedside Table",
            "Linen Sofa",
            "Oak Dining Table",
            "Oakley Lounge Chair",
            "Walnut Sideboard",
            "Wool Rug",
        ]
    );

    let table = products
        .iter()
        .find(|p| p.slug.as_deref() == Some("oak-dining-table"))
        .unwrap();
    assert_eq!(table.images.len(), 2);
    assert_eq!(
        table.images.first().and_then(|image| image.url()),
        Some("https://cdn.sanity.io/images/oakline/production/oak-table-1600x1200.jpg")
    );
    assert_eq!(
        table.category.as_ref().and_then(|c| c.slug.as_deref()),
        Some("dining")
    );
}

#[tokio::test]
async fn test_featured_excludes_out_of_stock() {
    let catalog = fixture_catalog().await;
    let featured = catalog.featured_products().await.unwrap();

    assert_eq!(
        names(featured.iter().map(|p| &p.name)),
        ["Linen Sofa", "Oak Dining Table"]
    );
    assert!(featured.iter().all(|p| p.stock.unwrap_or_default() > 0));
}

#[tokio::test]
async fn test_products_by_category() {
    let catalog = fixture_catalog().await;

    let dining = catalog.products_by_category("dining").await.unwrap();
    assert_eq!(
        names(dining.iter().map(|p| &p.name)),
        ["Oak Dining Table", "Walnut Sideboard"]
    );

    assert!(catalog.products_by_category("outdoor").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_product_by_slug() {
    let catalog = fixture_catalog().await;

    let sofa = catalog.product_by_slug("linen-sofa").await.unwrap().unwrap();
    assert_eq!(sofa.id, ProductId::new("prod-linen-sofa"));
    assert_eq!(sofa.display_price(), "$1899.00");
    assert_eq!(sofa.stock_level(FIXTURE_LOW_STOCK_THRESHOLD), StockLevel::InStock);

    assert!(catalog.product_by_slug("no-such-product").await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_price_displays_zero() {
    let catalog = fixture_catalog().await;
    let bench = catalog.product_by_slug("ash-bench").await.unwrap().unwrap();

    assert_eq!(bench.price, None);
    assert_eq!(bench.display_price(), "$0.00");
    assert!(bench.images.is_empty());
    assert!(bench.category.is_none());
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_default_filters_match_all_products() {
    let catalog = fixture_catalog().await;

    let all = catalog.all_products().await.unwrap();
    let filtered = catalog
        .filtered_products(&FilterParams::new(), SortOrder::Name)
        .await
        .unwrap();

    let mut all_ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
    all_ids.sort_unstable();
    assert_eq!(sorted_ids(&filtered), all_ids);
}

#[tokio::test]
async fn test_filters_combine() {
    let catalog = fixture_catalog().await;

    let filters = FilterParams::new()
        .with_min_price(Some(Decimal::from(300)))
        .with_max_price(Some(Decimal::from(1000)))
        .with_in_stock(true);
    let products = catalog
        .filtered_products(&filters, SortOrder::PriceAsc)
        .await
        .unwrap();

    assert_eq!(
        names(products.iter().map(|p| &p.name)),
        ["Wool Rug", "Oakley Lounge Chair", "Oak Dining Table"]
    );
}

#[tokio::test]
async fn test_filter_by_category_and_color() {
    let catalog = fixture_catalog().await;

    let filters = FilterParams::new()
        .with_category(Some("living-room"))
        .with_color(Some("walnut"));
    let products = catalog
        .filtered_products(&filters, SortOrder::Name)
        .await
        .unwrap();

    assert_eq!(names(products.iter().map(|p| &p.name)), ["Oakley Lounge Chair"]);
}

#[tokio::test]
async fn test_filtered_images_are_capped() {
    let catalog = fixture_catalog().await;

    let filters = FilterParams::new().with_material(Some("oak"));
    let products = catalog
        .filtered_products(&filters, SortOrder::Name)
        .await
        .unwrap();

    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p.images.len() <= 4));
}

#[tokio::test]
async fn test_every_sort_order_returns_the_same_set() {
    let catalog = fixture_catalog().await;

    for filters in [
        FilterParams::new(),
        FilterParams::new().with_search(Some("oak")),
        FilterParams::new().with_category(Some("living-room")).with_in_stock(true),
    ] {
        let by_name = catalog
            .filtered_products(&filters, SortOrder::Name)
            .await
            .unwrap();

        for sort in [SortOrder::PriceAsc, SortOrder::PriceDesc, SortOrder::Relevance] {
            let other = catalog.filtered_products(&filters, sort).await.unwrap();
            assert_eq!(
                sorted_ids(&other),
                sorted_ids(&by_name),
                "{sort:?} changed the result set for {filters:?}"
            );
        }
    }
}

#[tokio::test]
async fn test_price_orders_are_monotonic() {
    let catalog = fixture_catalog().await;
    let filters = FilterParams::new().with_category(Some("living-room"));

    let ascending: Vec<Decimal> = catalog
        .filtered_products(&filters, SortOrder::PriceAsc)
        .await
        .unwrap()
        .iter()
        .filter_map(|p| p.price)
        .collect();
    let descending: Vec<Decimal> = catalog
        .filtered_products(&filters, SortOrder::PriceDesc)
        .await
        .unwrap()
        .iter()
        .filter_map(|p| p.price)
        .collect();

    assert!(ascending.windows(2).all(|pair| matches!(pair, [a, b] if a <= b)));
    assert!(descending.windows(2).all(|pair| matches!(pair, [a, b] if a >= b)));
    assert_eq!(ascending.len(), 4);
}

// ============================================================================
// Search & Relevance
// ============================================================================

#[tokio::test]
async fn test_search_ranks_name_matches_first() {
    let catalog = fixture_catalog().await;
    let results = catalog.search_products("oak").await.unwrap();

    assert_eq!(
        names(results.iter().map(|p| &p.name)),
        [
            "Oak Dining Table",
            "Oakley Lounge Chair",
            "Linen Sofa",
            "Walnut Sideboard",
        ]
    );
    let scores: Vec<f64> = results.iter().filter_map(|p| p.score).collect();
    assert_eq!(scores, [4.0, 3.0, 1.0, 1.0]);
}

#[tokio::test]
async fn test_relevance_order_on_filtered_listing() {
    let catalog = fixture_catalog().await;
    let filters = FilterParams::new().with_search(Some("oak"));

    let products = catalog
        .filtered_products(&filters, SortOrder::Relevance)
        .await
        .unwrap();

    // Equal description-only scores fall back to name order
    assert_eq!(
        names(products.iter().map(|p| &p.name)),
        [
            "Oak Dining Table",
            "Oakley Lounge Chair",
            "Linen Sofa",
            "Walnut Sideboard",
        ]
    );
}

#[tokio::test]
async fn test_blank_search_returns_everything_by_name() {
    let catalog = fixture_catalog().await;
    let results = catalog.search_products("   ").await.unwrap();

    assert_eq!(results.len(), 8);
    assert_eq!(results.first().and_then(|p| p.name.as_deref()), Some("Arc Floor Lamp"));
    assert!(results.iter().all(|p| p.score.is_none()));
}

#[tokio::test]
async fn test_search_without_matches() {
    let catalog = fixture_catalog().await;
    assert!(catalog.search_products("teak").await.unwrap().is_empty());
}

// ============================================================================
// Cart Resolution
// ============================================================================

#[tokio::test]
async fn test_products_by_ids_skips_unknown_ids() {
    let catalog = fixture_catalog().await;

    let products = catalog
        .products_by_ids(&[
            ProductId::new("prod-oak-table"),
            ProductId::new("prod-discontinued"),
        ])
        .await
        .unwrap();

    assert_eq!(products.len(), 1);
    let table = products.first().unwrap();
    assert_eq!(table.id, ProductId::new("prod-oak-table"));
    assert!(table.can_fulfil(4));
    assert!(!table.can_fulfil(5));
}

#[tokio::test]
async fn test_products_by_ids_empty() {
    let catalog = fixture_catalog().await;
    assert!(catalog.products_by_ids(&[]).await.unwrap().is_empty());
}

// ============================================================================
// Inventory Reports
// ============================================================================

#[tokio::test]
async fn test_low_stock_report() {
    let catalog = fixture_catalog().await;
    let report = catalog.low_stock_products().await.unwrap();

    assert_eq!(
        names(report.iter().map(|p| &p.name)),
        ["Oakley Lounge Chair", "Ash Bench", "Oak Dining Table"]
    );
    for entry in &report {
        let stock = entry.stock.unwrap_or_default();
        assert!(stock > 0 && stock <= FIXTURE_LOW_STOCK_THRESHOLD);
        assert_eq!(entry.level(FIXTURE_LOW_STOCK_THRESHOLD), StockLevel::Low);
    }
}

#[tokio::test]
async fn test_out_of_stock_report() {
    let catalog = fixture_catalog().await;
    let report = catalog.out_of_stock_products().await.unwrap();

    assert_eq!(
        names(report.iter().map(|p| &p.name)),
        ["Arc Floor Lamp", "Walnut Sideboard"]
    );
    assert!(report.iter().all(|p| p.stock.is_none()));
}

// ============================================================================
// Assistant & Customers
// ============================================================================

#[tokio::test]
async fn test_assistant_search_matches_category_title() {
    let catalog = fixture_catalog().await;

    let filters = FilterParams::new().with_search(Some("living"));
    let products = catalog.assistant_search(&filters).await.unwrap();
    assert_eq!(
        names(products.iter().map(|p| &p.name)),
        ["Arc Floor Lamp", "Linen Sofa", "Oakley Lounge Chair", "Wool Rug"]
    );

    let in_stock = catalog
        .assistant_search(&filters.with_in_stock(true))
        .await
        .unwrap();
    assert_eq!(in_stock.len(), 3);
}

#[tokio::test]
async fn test_customer_lookups() {
    let catalog = fixture_catalog().await;

    let by_email = catalog
        .customer_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    let by_stripe = catalog.customer_by_stripe_id("cus_ada").await.unwrap().unwrap();
    assert_eq!(by_email, by_stripe);
    assert_eq!(by_email.clerk_user_id.as_deref(), Some("user_ada"));

    assert!(catalog.customer_by_email("bob@example.com").await.unwrap().is_none());
}

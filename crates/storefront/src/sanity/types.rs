//! Projected record shapes returned by catalog queries.
//!
//! Each struct mirrors one projection in [`crate::catalog::queries`]. Field
//! names follow the projected JSON keys (`_id`, `camelCase`), so records
//! serialize back out in the same shape the content store returns.

use chrono::{DateTime, Utc};
use oakline_core::{AssetId, CategoryId, CustomerId, ProductId, StockLevel, format_price};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Currency prefix used for display prices.
pub const CURRENCY_SYMBOL: &str = "$";

/// Deserialize `null` as the type's default (GROQ projects missing arrays as `null`).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Image Types
// =============================================================================

/// A dereferenced image asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(rename = "_id")]
    pub id: AssetId,
    pub url: String,
}

/// Focal point chosen in the studio, as fractions of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub width: f64,
}

/// One product image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Array item key (absent on single-image projections).
    #[serde(rename = "_key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// `None` when the asset reference is dangling.
    #[serde(default)]
    pub asset: Option<ImageAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotspot: Option<Hotspot>,
}

impl ProductImage {
    /// Asset URL, if the asset resolved.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.asset.as_ref().map(|asset| asset.url.as_str())
    }
}

// =============================================================================
// Category Types
// =============================================================================

/// Category as embedded in product projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub title: Option<String>,
    pub slug: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Full product record (all products, product by slug).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub price: Option<Decimal>,
    #[serde(deserialize_with = "null_as_default", default)]
    pub images: Vec<ProductImage>,
    pub category: Option<CategorySummary>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub dimensions: Option<String>,
    pub stock: Option<u32>,
    pub featured: Option<bool>,
    pub assembly_required: Option<bool>,
}

impl ProductDetail {
    #[must_use]
    pub fn display_price(&self) -> String {
        format_price(self.price, CURRENCY_SYMBOL)
    }

    /// Stock classification against a low-stock threshold.
    #[must_use]
    pub fn stock_level(&self, threshold: u32) -> StockLevel {
        StockLevel::classify(self.stock.unwrap_or_default(), threshold)
    }
}

/// Homepage carousel record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub price: Option<Decimal>,
    #[serde(deserialize_with = "null_as_default", default)]
    pub images: Vec<ProductImage>,
    pub category: Option<CategorySummary>,
    pub stock: Option<u32>,
}

/// Product grid card with a single primary image (category listing, search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCard {
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Relevance score, present on search results only.
    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub price: Option<Decimal>,
    pub image: Option<ProductImage>,
    pub category: Option<CategorySummary>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub stock: Option<u32>,
}

impl ProductCard {
    #[must_use]
    pub fn display_price(&self) -> String {
        format_price(self.price, CURRENCY_SYMBOL)
    }
}

/// Filtered listing record with up to four preview images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub price: Option<Decimal>,
    #[serde(deserialize_with = "null_as_default", default)]
    pub images: Vec<ProductImage>,
    pub category: Option<CategorySummary>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub stock: Option<u32>,
}

impl FilteredProduct {
    #[must_use]
    pub fn display_price(&self) -> String {
        format_price(self.price, CURRENCY_SYMBOL)
    }
}

/// Cart line resolution record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub price: Option<Decimal>,
    pub image: Option<ProductImage>,
    pub stock: Option<u32>,
}

impl CartProduct {
    /// Whether `quantity` units can be ordered.
    #[must_use]
    pub fn can_fulfil(&self, quantity: u32) -> bool {
        quantity > 0 && self.stock.unwrap_or_default() >= quantity
    }
}

/// Inventory report row (low stock, out of stock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReportEntry {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: Option<String>,
    pub slug: Option<String>,
    /// Absent on the out-of-stock report, where it is always zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    pub image: Option<ProductImage>,
}

impl StockReportEntry {
    #[must_use]
    pub fn level(&self, threshold: u32) -> StockLevel {
        StockLevel::classify(self.stock.unwrap_or_default(), threshold)
    }
}

/// Shopping assistant record: everything an agent needs to describe a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub price: Option<Decimal>,
    pub image: Option<ProductImage>,
    pub category: Option<CategorySummary>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub dimensions: Option<String>,
    pub stock: Option<u32>,
    pub featured: Option<bool>,
    pub assembly_required: Option<bool>,
}

// =============================================================================
// Customer Types
// =============================================================================

/// Customer document linking auth and billing identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: CustomerId,
    pub email: String,
    pub name: Option<String>,
    pub clerk_user_id: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_detail_with_nulls() {
        let detail: ProductDetail = serde_json::from_value(json!({
            "_id": "p-1",
            "name": "Oak Table",
            "slug": "oak-table",
            "description": null,
            "price": 599.99,
            "images": null,
            "category": null,
            "material": "oak",
            "color": null,
            "dimensions": "180 x 90 x 75 cm",
            "stock": 4,
            "featured": true,
            "assemblyRequired": false
        }))
        .unwrap();

        assert!(detail.images.is_empty());
        assert_eq!(detail.display_price(), "$599.99");
        assert_eq!(detail.stock_level(5), StockLevel::Low);
        assert_eq!(detail.assembly_required, Some(false));
    }

    #[test]
    fn test_missing_price_displays_zero() {
        let card: ProductCard = serde_json::from_value(json!({"_id": "p-2"})).unwrap();
        assert_eq!(card.price, None);
        assert_eq!(card.display_price(), "$0.00");
    }

    #[test]
    fn test_card_score_roundtrips_as_underscore_key() {
        let card: ProductCard = serde_json::from_value(json!({"_id": "p-3", "_score": 3})).unwrap();
        assert_eq!(card.score, Some(3.0));
        let out = serde_json::to_value(&card).unwrap();
        assert_eq!(out["_score"], json!(3.0));
    }

    #[test]
    fn test_price_serializes_as_number() {
        let card: FilteredProduct =
            serde_json::from_value(json!({"_id": "p-4", "price": 19.5, "images": []})).unwrap();
        let out = serde_json::to_value(&card).unwrap();
        assert_eq!(out["price"], json!(19.5));
    }

    #[test]
    fn test_dangling_image_asset() {
        let image: ProductImage =
            serde_json::from_value(json!({"_key": "a", "asset": null})).unwrap();
        assert_eq!(image.url(), None);
    }

    #[test]
    fn test_cart_can_fulfil() {
        let product: CartProduct =
            serde_json::from_value(json!({"_id": "p-5", "stock": 2})).unwrap();
        assert!(product.can_fulfil(2));
        assert!(!product.can_fulfil(3));
        assert!(!product.can_fulfil(0));
    }

    #[test]
    fn test_customer_timestamps() {
        let customer: Customer = serde_json::from_value(json!({
            "_id": "customer-1",
            "email": "ada@example.com",
            "name": "Ada",
            "clerkUserId": "user_123",
            "stripeCustomerId": "cus_456",
            "createdAt": "2025-03-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(customer.stripe_customer_id.as_deref(), Some("cus_456"));
        assert_eq!(customer.created_at.unwrap().to_rfc3339(), "2025-03-01T12:00:00+00:00");
    }
}

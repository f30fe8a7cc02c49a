//! Stock level classification.

use serde::{Deserialize, Serialize};

/// Inventory state of a product relative to a low-stock threshold.
///
/// Mirrors the partitions used by the inventory reports: `stock == 0` is out
/// of stock, `0 < stock <= threshold` is low, everything above is in stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

impl StockLevel {
    /// Classify a stock count.
    #[must_use]
    pub const fn classify(stock: u32, low_stock_threshold: u32) -> Self {
        if stock == 0 {
            Self::OutOfStock
        } else if stock <= low_stock_threshold {
            Self::Low
        } else {
            Self::InStock
        }
    }
}

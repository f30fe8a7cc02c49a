//! Price display.
//!
//! Prices are stored in the content store as plain numbers in the currency's
//! standard unit (dollars, not cents). Display always uses two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an optional amount with a currency prefix and two decimals.
///
/// A missing amount is treated as zero.
///
/// # Examples
///
/// ```
/// use oakline_core::format_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_price(Some(Decimal::new(195, 1)), "$"), "$19.50");
/// assert_eq!(format_price(None, "$"), "$0.00");
/// assert_eq!(format_price(Some(Decimal::from(100)), "€"), "€100.00");
/// ```
#[must_use]
pub fn format_price(amount: Option<Decimal>, currency: &str) -> String {
    let amount = amount
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{currency}{amount:.2}")
}

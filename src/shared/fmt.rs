//! Display helpers for prices.

use rust_decimal::prelude::*;

/// Format a price with exactly two fractional digits (`50.25`, `3.00`).
///
/// Rounds half away from zero, like `%.2f` on the display side.
pub fn format_price(value: &Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

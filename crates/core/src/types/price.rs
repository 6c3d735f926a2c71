//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product price.
///
/// Amounts are kept in the currency's standard unit (dollars, not cents)
/// as exact decimals. The catalog stores a bare numeric column, so the
/// currency is fixed per deployment rather than carried per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_cents() {
        let price = Price::new("49".parse().unwrap());
        assert_eq!(price.display(), "$49.00");
    }

    #[test]
    fn test_display_rounds_to_cents() {
        let price = Price::new("19.999".parse().unwrap());
        assert_eq!(price.display(), "$20.00");
    }

    #[test]
    fn test_display_plain() {
        let price = Price::new("59.95".parse().unwrap());
        assert_eq!(price.display(), "$59.95");
    }

    #[test]
    fn test_serde_matches_decimal() {
        let price = Price::new("12.50".parse().unwrap());
        let json = serde_json::to_string(&price).unwrap();
        let decimal_json = serde_json::to_string(&price.amount()).unwrap();
        assert_eq!(json, decimal_json);
    }
}

//! # Money Types
//!
//! Price representation for bazaar-cart.
//! Amounts are stored in the smallest currency unit (paise for INR).

use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    INR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::INR => "inr",
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
        }
    }

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u8 {
        2
    }

    /// Convert a decimal amount to the smallest currency unit (paise, cents)
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        (amount * multiplier).round() as i64
    }

    /// Convert from smallest unit back to decimal
    pub fn from_smallest_unit(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::INR
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (paise for INR)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a new price from decimal amount
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
        }
    }

    /// Create a price from smallest unit (paise)
    pub fn from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// A zero price in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_smallest_unit(self.amount)
    }

    /// Check for a zero amount
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Format for display (e.g., "₹499.00")
    pub fn display(&self) -> String {
        let symbol = match self.currency {
            Currency::INR => "₹",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
        };
        format!("{}{:.2}", symbol, self.as_decimal())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_conversion() {
        let inr = Currency::INR;
        assert_eq!(inr.to_smallest_unit(499.50), 49950);
        assert_eq!(inr.from_smallest_unit(49950), 499.50);
    }

    #[test]
    fn test_price_display() {
        let price = Price::new(1299.0, Currency::INR);
        assert_eq!(price.display(), "₹1299.00");

        let price_usd = Price::new(19.99, Currency::USD);
        assert_eq!(price_usd.display(), "$19.99");
    }

    #[test]
    fn test_price_ordering() {
        let cheap = Price::from_minor(20000, Currency::INR);
        let dear = Price::from_minor(30000, Currency::INR);
        assert!(cheap < dear);
        assert!(Price::zero(Currency::INR).is_zero());
    }
}

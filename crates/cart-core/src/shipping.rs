//! # Shipping & Fees
//!
//! Merchant-configured settings and the shipping charge derivation.
//! Settings are fetched once per checkout session; a fetch failure
//! degrades to all-zero settings so checkout is never blocked.

use crate::money::{Currency, Price};
use crate::pricing::PriceBreakdown;
use serde::{Deserialize, Serialize};

/// Merchant-configured checkout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Flat platform fee added to every order
    pub platform_fee: Price,

    /// Shipping fee charged below the free-shipping threshold
    pub shipping_fee: Price,

    /// Post-discount amount above which shipping is free.
    /// Zero disables free shipping entirely.
    pub free_shipping_threshold: Price,
}

impl Settings {
    /// All-zero settings in the given currency (the fail-open default)
    pub fn zero(currency: Currency) -> Self {
        Self {
            platform_fee: Price::zero(currency),
            shipping_fee: Price::zero(currency),
            free_shipping_threshold: Price::zero(currency),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::zero(Currency::default())
    }
}

/// Derive the shipping charge from the post-discount amount.
///
/// Shipping is waived only when the threshold is configured (> 0) and
/// the final amount strictly exceeds it. A zero threshold means the
/// free-shipping feature is disabled, not that everything ships free.
pub fn compute_shipping(final_amount: Price, settings: &Settings) -> Price {
    let threshold = settings.free_shipping_threshold.amount;
    if threshold > 0 && final_amount.amount > threshold {
        Price::zero(final_amount.currency)
    } else {
        settings.shipping_fee
    }
}

/// The displayed-total envelope handed to checkout and payment.
///
/// `payable` is the amount to charge; both the address flow and order
/// creation read it from here rather than re-deriving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// The underlying price breakdown
    pub breakdown: PriceBreakdown,

    /// Shipping charge derived from the breakdown and settings
    pub shipping: Price,

    /// Flat platform fee pass-through
    pub platform_fee: Price,

    /// `final_amount + shipping + platform_fee`
    pub payable: Price,
}

impl Quote {
    /// Assemble the quote for a breakdown under the given settings
    pub fn new(breakdown: PriceBreakdown, settings: &Settings) -> Self {
        let shipping = compute_shipping(breakdown.final_amount, settings);
        let payable = Price::from_minor(
            breakdown.final_amount.amount + shipping.amount + settings.platform_fee.amount,
            breakdown.final_amount.currency,
        );
        Self {
            breakdown,
            shipping,
            platform_fee: settings.platform_fee,
            payable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(shipping: f64, threshold: f64, platform: f64) -> Settings {
        Settings {
            platform_fee: Price::new(platform, Currency::INR),
            shipping_fee: Price::new(shipping, Currency::INR),
            free_shipping_threshold: Price::new(threshold, Currency::INR),
        }
    }

    #[test]
    fn test_free_above_threshold() {
        let s = settings(50.0, 1000.0, 0.0);
        let shipping = compute_shipping(Price::new(1200.0, Currency::INR), &s);
        assert!(shipping.is_zero());
    }

    #[test]
    fn test_charged_below_threshold() {
        let s = settings(50.0, 1000.0, 0.0);
        let shipping = compute_shipping(Price::new(900.0, Currency::INR), &s);
        assert_eq!(shipping, Price::new(50.0, Currency::INR));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Exactly at the threshold still pays shipping.
        let s = settings(50.0, 1000.0, 0.0);
        let shipping = compute_shipping(Price::new(1000.0, Currency::INR), &s);
        assert_eq!(shipping, Price::new(50.0, Currency::INR));
    }

    #[test]
    fn test_zero_threshold_disables_free_shipping() {
        let s = settings(50.0, 0.0, 0.0);
        let shipping = compute_shipping(Price::new(99999.0, Currency::INR), &s);
        assert_eq!(shipping, Price::new(50.0, Currency::INR));
    }

    #[test]
    fn test_zero_settings_cost_nothing() {
        let s = Settings::default();
        let shipping = compute_shipping(Price::new(500.0, Currency::INR), &s);
        assert!(shipping.is_zero());
    }

    #[test]
    fn test_quote_payable() {
        let s = settings(50.0, 1000.0, 20.0);
        let mut breakdown = PriceBreakdown::empty(Currency::INR);
        breakdown.final_amount = Price::new(900.0, Currency::INR);

        let quote = Quote::new(breakdown, &s);
        assert_eq!(quote.shipping, Price::new(50.0, Currency::INR));
        assert_eq!(quote.platform_fee, Price::new(20.0, Currency::INR));
        assert_eq!(quote.payable, Price::new(970.0, Currency::INR));
    }

    #[test]
    fn test_quote_payable_free_shipping() {
        let s = settings(50.0, 1000.0, 20.0);
        let mut breakdown = PriceBreakdown::empty(Currency::INR);
        breakdown.final_amount = Price::new(1200.0, Currency::INR);

        let quote = Quote::new(breakdown, &s);
        assert!(quote.shipping.is_zero());
        assert_eq!(quote.payable, Price::new(1220.0, Currency::INR));
    }
}

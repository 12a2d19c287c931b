//! # Pricing Engine
//!
//! The authoritative price computation for bazaar-cart.
//!
//! `compute_breakdown` is a pure function of the cart line items and
//! the (optional) applied coupon. It is recomputed from scratch on
//! every relevant input change and never incrementally patched, so the
//! displayed totals cannot drift from the inputs. Checkout and payment
//! both read the resulting amounts as the single source of truth.

use crate::coupon::{Coupon, CouponScope, Offer, OfferKind};
use crate::error::CouponError;
use crate::item::LineItem;
use crate::money::{Currency, Price};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The computed price breakdown for a cart.
///
/// Derived, never stored: every field is recomputed wholesale from the
/// line items and coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Sum of list prices across all lines (quantity included)
    pub total_mrp: Price,

    /// Sum of per-line catalog discounts, clamped to >= 0 per line
    pub total_discount: Price,

    /// Discount contributed by the applied coupon, always >= 0
    pub coupon_discount: Price,

    /// `max(0, total_mrp - total_discount - coupon_discount)`
    pub final_amount: Price,

    /// Coupon discount attributed to each eligible line item.
    /// The values sum exactly to `coupon_discount`.
    pub item_wise_discount: HashMap<String, Price>,

    /// Category ids the applied coupon is restricted to, when its
    /// scope is category-based
    pub applicable_categories: Vec<String>,

    /// Offer type of the applied coupon, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_offer_type: Option<OfferKind>,

    /// Normalized code of the applied coupon, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,

    /// Explanation when a coupon applied but discounted nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_message: Option<String>,

    /// Description of the free item for a BOGO coupon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bogo_message: Option<String>,
}

impl PriceBreakdown {
    /// A zeroed breakdown in the given currency
    pub fn empty(currency: Currency) -> Self {
        Self {
            total_mrp: Price::zero(currency),
            total_discount: Price::zero(currency),
            coupon_discount: Price::zero(currency),
            final_amount: Price::zero(currency),
            item_wise_discount: HashMap::new(),
            applicable_categories: Vec::new(),
            coupon_offer_type: None,
            coupon_code: None,
            coupon_message: None,
            bogo_message: None,
        }
    }

    /// Whether a coupon contributed a non-zero discount
    pub fn has_coupon_discount(&self) -> bool {
        self.coupon_discount.amount > 0
    }
}

/// Compute the authoritative price breakdown for a set of line items
/// and an optional coupon.
///
/// Coupon outcomes:
/// - below the coupon's minimum purchase: `CouponError::BelowMinimum`,
///   and the caller's previous breakdown stays valid
/// - scope matches nothing in the cart: success with a zero discount
///   and a `coupon_message`, never an error
pub fn compute_breakdown(
    items: &[LineItem],
    coupon: Option<&Coupon>,
) -> Result<PriceBreakdown, CouponError> {
    let currency = items
        .first()
        .map(|i| i.unit_price.currency)
        .unwrap_or_default();

    let mut total_mrp: i64 = 0;
    let mut total_discount: i64 = 0;
    for item in items {
        let list = item.unit_price.amount * item.quantity as i64;
        let effective = item.effective_total().amount;
        total_mrp += list;
        total_discount += (list - effective).max(0);
    }

    let mut breakdown = PriceBreakdown {
        total_mrp: Price::from_minor(total_mrp, currency),
        total_discount: Price::from_minor(total_discount, currency),
        coupon_discount: Price::zero(currency),
        final_amount: Price::from_minor((total_mrp - total_discount).max(0), currency),
        item_wise_discount: HashMap::new(),
        applicable_categories: Vec::new(),
        coupon_offer_type: None,
        coupon_code: None,
        coupon_message: None,
        bogo_message: None,
    };

    let Some(coupon) = coupon else {
        return Ok(breakdown);
    };

    if let Some(min) = coupon.min_purchase {
        if total_mrp < min.amount {
            return Err(CouponError::BelowMinimum {
                required: min,
                total: Price::from_minor(total_mrp, currency),
            });
        }
    }

    breakdown.coupon_offer_type = Some(coupon.kind());
    breakdown.coupon_code = Some(coupon.code.clone());
    if coupon.scope == CouponScope::Category {
        breakdown.applicable_categories = coupon.applicable_ids.clone();
    }

    let eligible: Vec<&LineItem> = items.iter().filter(|i| coupon.applies_to(i)).collect();
    let scoped: i64 = eligible.iter().map(|i| i.effective_total().amount).sum();

    if scoped == 0 {
        breakdown.coupon_message = Some(format!(
            "Coupon {} does not apply to any item in your cart",
            coupon.code
        ));
        return Ok(breakdown);
    }

    let coupon_discount = match &coupon.offer {
        Offer::Percentage(value) => {
            let discount = ((scoped as f64) * value / 100.0).round() as i64;
            split_pro_rata(&eligible, discount, scoped, currency, &mut breakdown);
            discount
        }
        Offer::FixedAmount(value) => {
            let discount = value.amount.min(scoped);
            split_pro_rata(&eligible, discount, scoped, currency, &mut breakdown);
            discount
        }
        Offer::Bogo => {
            // One unit of the cheapest eligible item is free. Ties are
            // broken on the lowest line-item id so the choice is stable.
            let free = eligible
                .iter()
                .min_by(|a, b| {
                    (a.effective_unit_price().amount, a.id.as_str())
                        .cmp(&(b.effective_unit_price().amount, b.id.as_str()))
                })
                .copied()
                .unwrap_or(eligible[0]);
            let discount = free.effective_unit_price().amount;
            breakdown
                .item_wise_discount
                .insert(free.id.clone(), Price::from_minor(discount, currency));
            breakdown.bogo_message = Some(format!(
                "Buy One Get One: one {} is free",
                free.product.name
            ));
            discount
        }
    };

    breakdown.coupon_discount = Price::from_minor(coupon_discount, currency);
    breakdown.final_amount = Price::from_minor(
        (total_mrp - total_discount - coupon_discount).max(0),
        currency,
    );

    Ok(breakdown)
}

/// Split a coupon discount across the eligible lines in proportion to
/// each line's share of the scoped amount. Shares are floored and the
/// remainder lands on the last eligible line, so the parts always sum
/// exactly to the discount.
fn split_pro_rata(
    eligible: &[&LineItem],
    discount: i64,
    scoped: i64,
    currency: Currency,
    breakdown: &mut PriceBreakdown,
) {
    let mut assigned: i64 = 0;
    for (index, item) in eligible.iter().enumerate() {
        let share = if index + 1 == eligible.len() {
            discount - assigned
        } else {
            let contribution = item.effective_total().amount;
            ((discount as i128 * contribution as i128) / scoped as i128) as i64
        };
        assigned += share;
        breakdown
            .item_wise_discount
            .insert(item.id.clone(), Price::from_minor(share, currency));
    }
}

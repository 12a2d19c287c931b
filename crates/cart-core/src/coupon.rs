//! # Coupon Types
//!
//! Coupon model for bazaar-cart.
//! The remote coupon catalog returns loosely typed records; those are
//! validated into the tagged `Offer` union at this boundary so the
//! pricing engine only ever sees well-formed coupons.

use crate::error::CouponError;
use crate::item::LineItem;
use crate::money::{Currency, Price};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Coupon offer discriminant, surfaced in the price breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferKind {
    Percentage,
    FixedAmount,
    Bogo,
}

/// Coupon offer with its value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Offer {
    /// Percentage off the scoped amount (0 < value <= 100)
    Percentage(f64),
    /// Fixed amount off, capped at the scoped amount
    FixedAmount(Price),
    /// Buy one get one: the cheapest eligible unit is free
    Bogo,
}

impl Offer {
    /// The discriminant for this offer
    pub fn kind(&self) -> OfferKind {
        match self {
            Offer::Percentage(_) => OfferKind::Percentage,
            Offer::FixedAmount(_) => OfferKind::FixedAmount,
            Offer::Bogo => OfferKind::Bogo,
        }
    }
}

/// Which line items a coupon is allowed to discount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponScope {
    /// Every item in the cart
    All,
    /// Items whose product category is in `applicable_ids`
    Category,
    /// Items whose product is in `applicable_ids`
    SpecificProduct,
}

/// A validated coupon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    /// Coupon code, normalized upper-case
    pub code: String,

    /// Offer type and value
    pub offer: Offer,

    /// Scope restriction
    pub scope: CouponScope,

    /// Category or product ids the coupon applies to.
    /// Empty (and ignored) for `All` scope.
    pub applicable_ids: Vec<String>,

    /// Minimum cart MRP required to apply the coupon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_purchase: Option<Price>,

    /// Customer-facing description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Coupon {
    /// Normalize a coupon code for lookup: codes are case-insensitive
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// The offer discriminant
    pub fn kind(&self) -> OfferKind {
        self.offer.kind()
    }

    /// Whether this coupon may discount the given line item
    pub fn applies_to(&self, item: &LineItem) -> bool {
        match self.scope {
            CouponScope::All => true,
            CouponScope::Category => self
                .applicable_ids
                .iter()
                .any(|id| *id == item.product.category_id),
            CouponScope::SpecificProduct => {
                self.applicable_ids.iter().any(|id| *id == item.product.id)
            }
        }
    }

    /// Validate a batch of remote records, skipping malformed ones.
    ///
    /// One bad record must not take down the whole coupon list.
    pub fn from_records(records: Vec<CouponRecord>) -> Vec<Coupon> {
        records
            .into_iter()
            .filter_map(|record| {
                let code = record.code.clone();
                match Coupon::try_from(record) {
                    Ok(coupon) => Some(coupon),
                    Err(e) => {
                        warn!("Skipping coupon {}: {}", code, e);
                        None
                    }
                }
            })
            .collect()
    }
}

/// A coupon record as returned by the remote catalog, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponRecord {
    /// Coupon code (any case)
    pub code: String,

    /// Offer type string, e.g. "percentage", "fixed_amount", "bogo"
    pub offer_type: String,

    /// Offer value in decimal currency units (or percent)
    #[serde(default)]
    pub offer_value: f64,

    /// Scope string, e.g. "all", "category", "specific_product"
    #[serde(default)]
    pub scope: Option<String>,

    /// Category or product ids for scoped coupons
    #[serde(default)]
    pub applicable_ids: Vec<String>,

    /// Minimum purchase in decimal currency units
    #[serde(default)]
    pub min_purchase: Option<f64>,

    /// Customer-facing description
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<CouponRecord> for Coupon {
    type Error = CouponError;

    fn try_from(record: CouponRecord) -> Result<Self, Self::Error> {
        let currency = Currency::default();

        let code = Coupon::normalize_code(&record.code);
        if code.is_empty() {
            return Err(CouponError::Malformed {
                reason: "empty coupon code".to_string(),
            });
        }

        let offer = match record.offer_type.trim().to_lowercase().as_str() {
            "percentage" => {
                if record.offer_value <= 0.0 || record.offer_value > 100.0 {
                    return Err(CouponError::Malformed {
                        reason: format!(
                            "percentage value {} out of range (0, 100]",
                            record.offer_value
                        ),
                    });
                }
                Offer::Percentage(record.offer_value)
            }
            "fixed_amount" | "fixedamount" | "flat" => {
                if record.offer_value <= 0.0 {
                    return Err(CouponError::Malformed {
                        reason: format!("fixed amount {} must be positive", record.offer_value),
                    });
                }
                Offer::FixedAmount(Price::new(record.offer_value, currency))
            }
            "bogo" | "buy_one_get_one" => Offer::Bogo,
            other => {
                return Err(CouponError::Malformed {
                    reason: format!("unknown offer type: {}", other),
                })
            }
        };

        let scope = match record
            .scope
            .as_deref()
            .unwrap_or("all")
            .trim()
            .to_lowercase()
            .as_str()
        {
            "all" => CouponScope::All,
            "category" => CouponScope::Category,
            "specific_product" | "product" => CouponScope::SpecificProduct,
            other => {
                return Err(CouponError::Malformed {
                    reason: format!("unknown scope: {}", other),
                })
            }
        };

        if scope != CouponScope::All && record.applicable_ids.is_empty() {
            return Err(CouponError::Malformed {
                reason: "scoped coupon has no applicable ids".to_string(),
            });
        }

        let min_purchase = match record.min_purchase {
            Some(v) if v > 0.0 => Some(Price::new(v, currency)),
            _ => None,
        };

        Ok(Coupon {
            code,
            offer,
            scope,
            // Scope `All` ignores ids; drop them so they cannot leak
            // into the breakdown's applicable categories.
            applicable_ids: if scope == CouponScope::All {
                Vec::new()
            } else {
                record.applicable_ids
            },
            min_purchase,
            description: record.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Product;

    fn record(offer_type: &str, value: f64, scope: Option<&str>, ids: &[&str]) -> CouponRecord {
        CouponRecord {
            code: "save10".to_string(),
            offer_type: offer_type.to_string(),
            offer_value: value,
            scope: scope.map(String::from),
            applicable_ids: ids.iter().map(|s| s.to_string()).collect(),
            min_purchase: None,
            description: None,
        }
    }

    fn item_in(category: &str, product_id: &str) -> LineItem {
        let product = Product::new(
            product_id,
            "Item",
            category,
            Price::new(500.0, Currency::INR),
        );
        LineItem::from_product("li-1", &product, "v-1", 1)
    }

    #[test]
    fn test_code_normalization() {
        let coupon = Coupon::try_from(record("percentage", 10.0, None, &[])).unwrap();
        assert_eq!(coupon.code, "SAVE10");
        assert_eq!(Coupon::normalize_code("  festive50 "), "FESTIVE50");
    }

    #[test]
    fn test_percentage_out_of_range_rejected() {
        assert!(Coupon::try_from(record("percentage", 0.0, None, &[])).is_err());
        assert!(Coupon::try_from(record("percentage", 120.0, None, &[])).is_err());
        assert!(Coupon::try_from(record("percentage", 100.0, None, &[])).is_ok());
    }

    #[test]
    fn test_unknown_offer_type_rejected() {
        let err = Coupon::try_from(record("cashback", 50.0, None, &[])).unwrap_err();
        assert!(matches!(err, CouponError::Malformed { .. }));
    }

    #[test]
    fn test_scoped_coupon_requires_ids() {
        let err = Coupon::try_from(record("percentage", 10.0, Some("category"), &[])).unwrap_err();
        assert!(matches!(err, CouponError::Malformed { .. }));

        let ok = Coupon::try_from(record("percentage", 10.0, Some("category"), &["cat-1"]));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_all_scope_drops_ids() {
        let coupon = Coupon::try_from(record("bogo", 0.0, Some("all"), &["cat-1"])).unwrap();
        assert!(coupon.applicable_ids.is_empty());
        assert_eq!(coupon.kind(), OfferKind::Bogo);
    }

    #[test]
    fn test_scope_matching() {
        let all = Coupon::try_from(record("percentage", 10.0, None, &[])).unwrap();
        let by_category =
            Coupon::try_from(record("percentage", 10.0, Some("category"), &["cat-shoes"])).unwrap();
        let by_product = Coupon::try_from(record(
            "percentage",
            10.0,
            Some("specific_product"),
            &["p-42"],
        ))
        .unwrap();

        let shoe = item_in("cat-shoes", "p-42");
        let shirt = item_in("cat-shirts", "p-7");

        assert!(all.applies_to(&shoe) && all.applies_to(&shirt));
        assert!(by_category.applies_to(&shoe));
        assert!(!by_category.applies_to(&shirt));
        assert!(by_product.applies_to(&shoe));
        assert!(!by_product.applies_to(&shirt));
    }

    #[test]
    fn test_from_records_skips_malformed() {
        let records = vec![
            record("percentage", 10.0, None, &[]),
            record("cashback", 10.0, None, &[]),
            record("flat", 300.0, None, &[]),
        ];
        let coupons = Coupon::from_records(records);
        assert_eq!(coupons.len(), 2);
    }

    #[test]
    fn test_min_purchase_parsed() {
        let mut raw = record("flat", 300.0, None, &[]);
        raw.min_purchase = Some(1000.0);
        let coupon = Coupon::try_from(raw).unwrap();
        assert_eq!(coupon.min_purchase, Some(Price::new(1000.0, Currency::INR)));
    }
}

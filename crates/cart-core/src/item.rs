//! # Cart Item Types
//!
//! Line item and cart types for bazaar-cart.
//! The cart is owned by the remote cart service; the in-memory copy is
//! never authoritative and is re-fetched after every mutation.

use crate::money::{Currency, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product as denormalized into a cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Category this product belongs to (coupon scope target)
    pub category_id: String,

    /// Catalog list price (MRP)
    pub price: Price,

    /// Discounted sale price, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Create a product with list price only
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category_id: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_id: category_id.into(),
            price,
            discount_price: None,
            image_url: None,
        }
    }

    /// Builder: set discount price
    pub fn with_discount_price(mut self, price: Price) -> Self {
        self.discount_price = Some(price);
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Effective price: the discount price when present and positive,
    /// the list price otherwise
    pub fn effective_price(&self) -> Price {
        match self.discount_price {
            Some(p) if p.amount > 0 => p,
            _ => self.price,
        }
    }
}

/// A line item in a cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Line item ID (assigned by the cart service)
    pub id: String,

    /// Product snapshot
    pub product: Product,

    /// Selected variant
    pub variant_id: String,

    /// Selected color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Selected size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Quantity, always at least 1
    pub quantity: u32,

    /// Unit list price at the time the item was added
    pub unit_price: Price,

    /// Unit discount price at the time the item was added, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_discount_price: Option<Price>,
}

impl LineItem {
    /// Create a line item from a product snapshot
    pub fn from_product(
        id: impl Into<String>,
        product: &Product,
        variant_id: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            product: product.clone(),
            variant_id: variant_id.into(),
            color: None,
            size: None,
            quantity,
            unit_price: product.price,
            unit_discount_price: product.discount_price,
        }
    }

    /// Builder: set size
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Builder: set color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Effective unit price: the discount price when present and
    /// positive, the list price otherwise
    pub fn effective_unit_price(&self) -> Price {
        match self.unit_discount_price {
            Some(p) if p.amount > 0 => p,
            _ => self.unit_price,
        }
    }

    /// List-price total for this line (quantity x MRP)
    pub fn mrp_total(&self) -> Price {
        Price {
            amount: self.unit_price.amount * self.quantity as i64,
            currency: self.unit_price.currency,
        }
    }

    /// Effective total for this line (quantity x effective unit price)
    pub fn effective_total(&self) -> Price {
        let unit = self.effective_unit_price();
        Price {
            amount: unit.amount * self.quantity as i64,
            currency: unit.currency,
        }
    }
}

/// The remote-owned cart for one user session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID (assigned by the cart service)
    pub id: String,

    /// Line items
    pub items: Vec<LineItem>,

    /// Last modification timestamp from the cart service
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// An empty cart with the given id
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Check if the cart has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Find a line item by its id
    pub fn find_item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Currency of the cart (single-currency by construction)
    pub fn currency(&self) -> Currency {
        self.items
            .first()
            .map(|i| i.unit_price.currency)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kurta() -> Product {
        Product::new("p-kurta", "Cotton Kurta", "cat-apparel", Price::new(1299.0, Currency::INR))
            .with_discount_price(Price::new(999.0, Currency::INR))
    }

    #[test]
    fn test_effective_price_prefers_discount() {
        let product = kurta();
        assert_eq!(product.effective_price(), Price::new(999.0, Currency::INR));

        let full_price = Product::new(
            "p-socks",
            "Socks",
            "cat-apparel",
            Price::new(99.0, Currency::INR),
        );
        assert_eq!(full_price.effective_price(), Price::new(99.0, Currency::INR));
    }

    #[test]
    fn test_zero_discount_price_ignored() {
        let product = Product::new(
            "p-belt",
            "Belt",
            "cat-accessories",
            Price::new(499.0, Currency::INR),
        )
        .with_discount_price(Price::zero(Currency::INR));

        assert_eq!(product.effective_price(), Price::new(499.0, Currency::INR));
    }

    #[test]
    fn test_line_totals() {
        let item = LineItem::from_product("li-1", &kurta(), "v-m", 3).with_size("M");

        assert_eq!(item.mrp_total(), Price::new(3897.0, Currency::INR));
        assert_eq!(item.effective_total(), Price::new(2997.0, Currency::INR));
    }

    #[test]
    fn test_cart_helpers() {
        let mut cart = Cart::empty("cart-1");
        assert!(cart.is_empty());

        cart.items
            .push(LineItem::from_product("li-1", &kurta(), "v-m", 2));
        cart.items
            .push(LineItem::from_product("li-2", &kurta(), "v-l", 1));

        assert_eq!(cart.item_count(), 3);
        assert!(cart.find_item("li-2").is_some());
        assert!(cart.find_item("li-9").is_none());
        assert_eq!(cart.currency(), Currency::INR);
    }
}

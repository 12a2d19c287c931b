//! # cart-core
//!
//! Core types and pricing engine for the bazaar-cart storefront.
//!
//! This crate provides:
//! - `compute_breakdown` and `PriceBreakdown`, the authoritative cart
//!   price computation
//! - `Coupon` with its tagged offer union and boundary validation
//! - `compute_shipping`, `Settings`, and the `Quote` envelope
//! - `CartBackend` trait and `CartStore` mutation orchestration
//! - `CouponError`, `CartMutationError`, `SettingsFetchError`
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{compute_breakdown, CartStore, Quote, SessionContext};
//!
//! // Open a session-scoped store over a remote backend
//! let session = SessionContext::authenticated("cart-42", "u-7", token);
//! let mut store = CartStore::open(backend, session).await?;
//!
//! // Mutate; the store reloads the authoritative cart after the write
//! store.update_quantity("li-3", 2).await?;
//!
//! // Apply a coupon and read the displayed total
//! store.apply_coupon("FESTIVE50").await?;
//! let quote = store.quote();
//! println!("payable: {}", quote.payable.display());
//! ```

pub mod coupon;
pub mod error;
pub mod item;
pub mod money;
pub mod pricing;
pub mod session;
pub mod shipping;
pub mod store;

// Re-exports for convenience
pub use coupon::{Coupon, CouponRecord, CouponScope, Offer, OfferKind};
pub use error::{CartMutationError, CartResult, CouponError, SettingsFetchError};
pub use item::{Cart, LineItem, Product};
pub use money::{Currency, Price};
pub use pricing::{compute_breakdown, PriceBreakdown};
pub use session::SessionContext;
pub use shipping::{compute_shipping, Quote, Settings};
pub use store::{
    AddItemRequest, BoxedCartBackend, BulkOutcome, CartBackend, CartStore, MoveOutcome,
};

//! # Cart Store
//!
//! Mutation orchestration against the remote cart service.
//!
//! The remote cart is authoritative: every mutation is a round trip
//! followed by a full reload of the local copy. No client-side
//! prediction of the resulting cart or totals happens here, which is
//! what keeps concurrent tabs and devices from drifting apart.

use crate::coupon::{Coupon, CouponRecord};
use crate::error::{CartMutationError, CartResult, CouponError, SettingsFetchError};
use crate::item::Cart;
use crate::pricing::{compute_breakdown, PriceBreakdown};
use crate::session::SessionContext;
use crate::shipping::{Quote, Settings};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Payload for adding a product to the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemRequest {
    /// Product to add
    pub product_id: String,
    /// Selected variant
    pub variant_id: String,
    /// Quantity to add
    pub quantity: u32,
    /// Selected size, if the product has sizes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Contract with the remote cart service.
///
/// One implementation talks HTTP to the commerce API; tests provide
/// in-memory fakes. All operations take the session explicitly.
#[async_trait]
pub trait CartBackend: Send + Sync {
    /// Fetch the authoritative cart for this session
    async fn fetch_cart(&self, session: &SessionContext) -> CartResult<Cart>;

    /// Add a product to the cart. The remote may reject (out of stock).
    async fn add_to_cart(&self, session: &SessionContext, request: &AddItemRequest)
        -> CartResult<()>;

    /// Remove a line item. Removing an absent item is a no-op success.
    async fn remove_from_cart(&self, session: &SessionContext, item_id: &str) -> CartResult<()>;

    /// Set a line item's quantity (always >= 1)
    async fn update_quantity(
        &self,
        session: &SessionContext,
        item_id: &str,
        quantity: u32,
    ) -> CartResult<()>;

    /// Add a product to the user's wishlist
    async fn add_to_wishlist(&self, session: &SessionContext, product_id: &str) -> CartResult<()>;

    /// List the coupons available to this user. Requires an auth token.
    async fn get_all_coupons(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<CouponRecord>, CouponError>;

    /// Fetch merchant checkout settings
    async fn get_settings(&self) -> Result<Settings, SettingsFetchError>;
}

/// Type alias for a shared cart backend (dynamic dispatch)
pub type BoxedCartBackend = Arc<dyn CartBackend>;

/// Outcome of a move-to-wishlist operation.
///
/// The remove and the wishlist add hit two independent remote
/// resources; a wishlist failure after a successful remove is reported
/// as partial success, not rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Removed from cart and added to the wishlist
    Moved,
    /// Removed from cart, but the wishlist add failed
    RemovedOnly { wishlist_error: String },
}

/// Outcome of a best-effort bulk operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    /// Items fully processed
    pub succeeded: Vec<String>,
    /// Items removed from the cart whose wishlist add failed
    pub partial: Vec<(String, String)>,
    /// Items that failed outright, with the failure reason
    pub failed: Vec<(String, String)>,
}

impl BulkOutcome {
    /// Whether any item failed outright
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Session-local cart state: the latest authoritative cart copy, the
/// applied coupon, and the breakdown derived from both.
pub struct CartStore {
    backend: BoxedCartBackend,
    session: SessionContext,
    settings: Settings,
    cart: Cart,
    applied_coupon: Option<Coupon>,
    breakdown: PriceBreakdown,
}

impl CartStore {
    /// Open a store for the session: fetch settings (fail open) and the
    /// current cart, and compute the initial breakdown.
    pub async fn open(backend: BoxedCartBackend, session: SessionContext) -> CartResult<Self> {
        let settings = match backend.get_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Settings fetch failed, checkout continues with zero fees: {}", e);
                Settings::default()
            }
        };

        let cart = backend.fetch_cart(&session).await?;
        let breakdown = compute_breakdown(&cart.items, None)
            .unwrap_or_else(|_| PriceBreakdown::empty(cart.currency()));

        Ok(Self {
            backend,
            session,
            settings,
            cart,
            applied_coupon: None,
            breakdown,
        })
    }

    /// The latest authoritative cart copy
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The current price breakdown
    pub fn breakdown(&self) -> &PriceBreakdown {
        &self.breakdown
    }

    /// The currently applied coupon, if any
    pub fn applied_coupon(&self) -> Option<&Coupon> {
        self.applied_coupon.as_ref()
    }

    /// Settings cached for this session
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The displayed-total envelope under this session's settings
    pub fn quote(&self) -> Quote {
        Quote::new(self.breakdown.clone(), &self.settings)
    }

    /// Re-fetch the authoritative cart and recompute the breakdown
    async fn reload(&mut self) -> CartResult<()> {
        self.cart = self.backend.fetch_cart(&self.session).await?;
        self.recompute();
        Ok(())
    }

    /// Recompute the breakdown wholesale. A coupon invalidated by a
    /// cart change (min purchase no longer met) is dropped rather than
    /// leaving a stale breakdown around.
    fn recompute(&mut self) {
        match compute_breakdown(&self.cart.items, self.applied_coupon.as_ref()) {
            Ok(breakdown) => self.breakdown = breakdown,
            Err(e) => {
                warn!("Removing applied coupon after cart change: {}", e);
                self.applied_coupon = None;
                self.breakdown = compute_breakdown(&self.cart.items, None)
                    .unwrap_or_else(|_| PriceBreakdown::empty(self.cart.currency()));
            }
        }
    }

    /// Add a product to the cart, then reload
    pub async fn add_to_cart(&mut self, request: &AddItemRequest) -> CartResult<()> {
        self.backend.add_to_cart(&self.session, request).await?;
        info!(
            "Added product {} x{} to cart {}",
            request.product_id, request.quantity, self.session.cart_id
        );
        self.reload().await
    }

    /// Remove a line item, then reload. Idempotent: removing an id that
    /// is already gone succeeds.
    pub async fn remove_from_cart(&mut self, item_id: &str) -> CartResult<()> {
        self.backend.remove_from_cart(&self.session, item_id).await?;
        self.reload().await
    }

    /// Set a line item's quantity, then reload. Quantities below 1 are
    /// rejected locally before any round trip; the last unit must be
    /// removed, not zeroed.
    pub async fn update_quantity(&mut self, item_id: &str, quantity: u32) -> CartResult<()> {
        if quantity < 1 {
            return Err(CartMutationError::InvalidQuantity { quantity });
        }
        self.backend
            .update_quantity(&self.session, item_id, quantity)
            .await?;
        self.reload().await
    }

    /// Move a line item to the wishlist: remove first, then add.
    ///
    /// If the remove fails the wishlist add is skipped and the error
    /// surfaces. If the wishlist add fails after a successful remove,
    /// the item stays removed and the partial success is reported.
    pub async fn move_to_wishlist(
        &mut self,
        item_id: &str,
        product_id: &str,
    ) -> CartResult<MoveOutcome> {
        self.backend.remove_from_cart(&self.session, item_id).await?;

        let outcome = match self.backend.add_to_wishlist(&self.session, product_id).await {
            Ok(()) => MoveOutcome::Moved,
            Err(e) => {
                warn!("Wishlist add failed after cart remove: {}", e);
                MoveOutcome::RemovedOnly {
                    wishlist_error: e.to_string(),
                }
            }
        };

        self.reload().await?;
        Ok(outcome)
    }

    /// Remove a selection of line items, best effort: one failure does
    /// not abort the remaining items.
    pub async fn remove_many(&mut self, item_ids: &[String]) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for item_id in item_ids {
            match self.remove_from_cart(item_id).await {
                Ok(()) => outcome.succeeded.push(item_id.clone()),
                Err(e) => outcome.failed.push((item_id.clone(), e.to_string())),
            }
        }
        outcome
    }

    /// Move a selection of line items to the wishlist, best effort
    pub async fn move_many(&mut self, selection: &[(String, String)]) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for (item_id, product_id) in selection {
            match self.move_to_wishlist(item_id, product_id).await {
                Ok(MoveOutcome::Moved) => outcome.succeeded.push(item_id.clone()),
                Ok(MoveOutcome::RemovedOnly { wishlist_error }) => {
                    outcome.partial.push((item_id.clone(), wishlist_error));
                }
                Err(e) => outcome.failed.push((item_id.clone(), e.to_string())),
            }
        }
        outcome
    }

    /// Apply a coupon by code, replacing any previously applied one.
    ///
    /// On any error the previously computed breakdown stays intact, so
    /// the customer never sees a partially applied state.
    pub async fn apply_coupon(&mut self, code: &str) -> Result<&PriceBreakdown, CouponError> {
        let normalized = Coupon::normalize_code(code);
        let records = self.backend.get_all_coupons(&self.session).await?;
        let coupon = Coupon::from_records(records)
            .into_iter()
            .find(|c| c.code == normalized)
            .ok_or(CouponError::NotFound { code: normalized })?;

        let breakdown = compute_breakdown(&self.cart.items, Some(&coupon))?;

        info!(
            "Applied coupon {} to cart {}: discount {}",
            coupon.code,
            self.session.cart_id,
            breakdown.coupon_discount.display()
        );
        self.applied_coupon = Some(coupon);
        self.breakdown = breakdown;
        Ok(&self.breakdown)
    }

    /// Clear the applied coupon and restore the pre-coupon breakdown
    pub fn remove_coupon(&mut self) -> &PriceBreakdown {
        self.applied_coupon = None;
        self.recompute();
        &self.breakdown
    }
}

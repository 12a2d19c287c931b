//! # Cart Error Types
//!
//! Typed error handling for the bazaar-cart pricing and cart engine.
//! Three categories are distinguished: coupon application, cart
//! mutation, and settings fetch (the last is always swallowed into
//! zero-cost defaults by callers).

use thiserror::Error;

use crate::money::Price;

/// Errors raised while resolving or applying a coupon.
///
/// A coupon whose scope matches nothing in the cart is NOT an error:
/// the engine reports a zero discount with an explanatory message.
#[derive(Debug, Error)]
pub enum CouponError {
    /// Coupon code does not exist in the user's coupon list
    #[error("Coupon not found: {code}")]
    NotFound { code: String },

    /// Cart total is below the coupon's minimum purchase amount
    #[error("Cart total {total} is below the minimum purchase {required} for this coupon")]
    BelowMinimum { required: Price, total: Price },

    /// Coupon listing requires an authenticated user
    #[error("Sign in to view and apply coupons")]
    AuthRequired,

    /// Remote coupon record failed boundary validation
    #[error("Malformed coupon record: {reason}")]
    Malformed { reason: String },
}

impl CouponError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CouponError::NotFound { .. } => 404,
            CouponError::BelowMinimum { .. } => 422,
            CouponError::AuthRequired => 401,
            CouponError::Malformed { .. } => 502,
        }
    }
}

/// Errors raised by cart mutations against the remote cart service
#[derive(Debug, Error)]
pub enum CartMutationError {
    /// Client configuration error (missing base URL, bad API key)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote rejected the mutation (e.g., item out of stock)
    #[error("Cart update rejected: {reason}")]
    Rejected { reason: String },

    /// Quantity must be at least 1; the last unit is removed, not zeroed
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: u32 },

    /// Caller is not authenticated for this operation
    #[error("Authentication required")]
    Unauthorized,

    /// Network/HTTP error communicating with the cart service
    #[error("Network error: {0}")]
    Network(String),

    /// Response payload could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CartMutationError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, CartMutationError::Network(_))
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CartMutationError::Configuration(_) => 500,
            CartMutationError::Rejected { .. } => 422,
            CartMutationError::InvalidQuantity { .. } => 400,
            CartMutationError::Unauthorized => 401,
            CartMutationError::Network(_) => 503,
            CartMutationError::Serialization(_) => 502,
        }
    }
}

/// Failure to fetch merchant settings.
///
/// Callers degrade to all-zero settings instead of blocking checkout.
#[derive(Debug, Error)]
pub enum SettingsFetchError {
    #[error("Network error fetching settings: {0}")]
    Network(String),

    #[error("Failed to decode settings payload: {0}")]
    Serialization(String),
}

/// Result type alias for cart mutations
pub type CartResult<T> = Result<T, CartMutationError>;

//! # Session Context
//!
//! Explicit session state passed into every remote call.
//! Nothing in the engine reads ambient state (cookies, local storage,
//! globals); the caller owns the context and hands it down, which
//! keeps the pricing functions pure and testable.

use serde::{Deserialize, Serialize};

/// Identity and cart binding for the current storefront session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    /// Cart ID at the remote cart service
    pub cart_id: String,

    /// Authenticated user id, if signed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Bearer token for authenticated endpoints (coupon listing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl SessionContext {
    /// Anonymous session bound to a cart
    pub fn anonymous(cart_id: impl Into<String>) -> Self {
        Self {
            cart_id: cart_id.into(),
            user_id: None,
            auth_token: None,
        }
    }

    /// Authenticated session
    pub fn authenticated(
        cart_id: impl Into<String>,
        user_id: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            cart_id: cart_id.into(),
            user_id: Some(user_id.into()),
            auth_token: Some(auth_token.into()),
        }
    }

    /// Whether the session carries an auth token
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }
}

//! # cart-remote
//!
//! Commerce API client for bazaar-cart-rs.
//!
//! The remote service owns the cart, wishlist, coupon catalog, and
//! merchant settings; this crate is the storefront's only way to reach
//! them. It implements `cart_core::CartBackend` over JSON REST with:
//!
//! - typed error mapping for rejected mutations
//! - idempotency request ids on every write
//! - empty-cart fallback for carts that do not exist yet
//! - fail-open settings (`settings_or_default`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_remote::HttpCartBackend;
//! use cart_core::{CartStore, SessionContext};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(HttpCartBackend::from_env()?);
//! let session = SessionContext::authenticated("cart-42", "u-7", token);
//! let mut store = CartStore::open(backend, session).await?;
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::HttpCartBackend;
pub use config::RemoteConfig;

//! # cart-api
//!
//! HTTP API layer for bazaar-cart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for cart mutations and the authoritative quote
//! - Coupon listing and merchant settings pass-through
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/cart` | Cart with breakdown |
//! | POST | `/api/v1/cart/items` | Add a product |
//! | PATCH | `/api/v1/cart/items/{id}` | Update quantity |
//! | DELETE | `/api/v1/cart/items/{id}` | Remove line item |
//! | POST | `/api/v1/cart/items/{id}/move-to-wishlist` | Move to wishlist |
//! | POST | `/api/v1/cart/quote` | Quote with optional coupon |
//! | GET | `/api/v1/coupons` | Coupons for the signed-in user |
//! | GET | `/api/v1/settings` | Merchant checkout settings |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};

//! # Routes
//!
//! Axum router configuration for the storefront cart API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET    /health - Health check
/// - GET    /api/v1/cart - Cart with current breakdown
/// - POST   /api/v1/cart/items - Add a product
/// - PATCH  /api/v1/cart/items/{item_id} - Update quantity
/// - DELETE /api/v1/cart/items/{item_id} - Remove (idempotent)
/// - POST   /api/v1/cart/items/{item_id}/move-to-wishlist
/// - POST   /api/v1/cart/quote - Authoritative quote (optional coupon)
/// - GET    /api/v1/coupons - Coupons for the signed-in user
/// - GET    /api/v1/settings - Merchant checkout settings
pub fn create_router(state: AppState) -> Router {
    // The storefront is served from a different origin than this API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cart_routes = Router::new()
        .route("/cart", get(handlers::get_cart))
        .route("/cart/items", post(handlers::add_item))
        .route(
            "/cart/items/{item_id}",
            patch(handlers::update_item).delete(handlers::remove_item),
        )
        .route(
            "/cart/items/{item_id}/move-to-wishlist",
            post(handlers::move_item),
        )
        .route("/cart/quote", post(handlers::quote))
        .route("/coupons", get(handlers::list_coupons))
        .route("/settings", get(handlers::get_settings));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", cart_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

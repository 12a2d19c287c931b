//! # Request Handlers
//!
//! Axum request handlers for the storefront cart API.
//! Every handler opens a session-scoped `CartStore`, so mutations get
//! the reload-after-write discipline and the response always carries
//! the authoritative cart plus its freshly computed breakdown.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use cart_core::{
    AddItemRequest, Cart, CartBackend, CartMutationError, CartStore, Coupon, CouponError,
    MoveOutcome, PriceBreakdown, Quote, SessionContext, Settings,
};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Add-to-cart request body
#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    /// Product to add
    pub product_id: String,
    /// Selected variant
    pub variant_id: String,
    /// Quantity (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Selected size
    #[serde(default)]
    pub size: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

/// Quantity-update request body
#[derive(Debug, Deserialize)]
pub struct UpdateItemBody {
    pub quantity: u32,
}

/// Move-to-wishlist request body
#[derive(Debug, Deserialize)]
pub struct MoveItemBody {
    pub product_id: String,
}

/// Quote request body
#[derive(Debug, Default, Deserialize)]
pub struct QuoteRequest {
    /// Coupon code to apply before quoting
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// Cart state response: the authoritative cart and its breakdown
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Cart,
    pub breakdown: PriceBreakdown,
}

/// Move-to-wishlist response
#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub outcome: MoveOutcome,
    pub cart: Cart,
    pub breakdown: PriceBreakdown,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn mutation_error_to_response(err: CartMutationError) -> HandlerError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn coupon_error_to_response(err: CouponError) -> HandlerError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Build the session context from request headers.
///
/// The cart binding is mandatory; identity is optional and only needed
/// for coupon listing and wishlist moves.
fn session_from_headers(headers: &HeaderMap) -> Result<SessionContext, HandlerError> {
    let cart_id = headers
        .get("x-cart-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Missing X-Cart-Id header", 400)),
            )
        })?;

    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let auth_token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    Ok(SessionContext {
        cart_id,
        user_id,
        auth_token,
    })
}

/// Open a session-scoped store over the shared backend
async fn open_store(state: &AppState, session: SessionContext) -> Result<CartStore, HandlerError> {
    CartStore::open(state.backend.clone(), session)
        .await
        .map_err(|e| {
            error!("Failed to load cart: {}", e);
            mutation_error_to_response(e)
        })
}

fn cart_response(store: &CartStore) -> Json<CartResponse> {
    Json(CartResponse {
        cart: store.cart().clone(),
        breakdown: store.breakdown().clone(),
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "bazaar-cart",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Fetch the cart with its current breakdown
#[instrument(skip(state, headers))]
pub async fn get_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CartResponse>, HandlerError> {
    let session = session_from_headers(&headers)?;
    let store = open_store(&state, session).await?;
    Ok(cart_response(&store))
}

/// Add a product to the cart
#[instrument(skip(state, headers, body), fields(product_id = %body.product_id))]
pub async fn add_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AddItemBody>,
) -> Result<Json<CartResponse>, HandlerError> {
    if body.quantity < 1 {
        return Err(mutation_error_to_response(
            CartMutationError::InvalidQuantity {
                quantity: body.quantity,
            },
        ));
    }

    let session = session_from_headers(&headers)?;
    let mut store = open_store(&state, session).await?;

    let request = AddItemRequest {
        product_id: body.product_id,
        variant_id: body.variant_id,
        quantity: body.quantity,
        size: body.size,
    };
    store
        .add_to_cart(&request)
        .await
        .map_err(mutation_error_to_response)?;

    Ok(cart_response(&store))
}

/// Update a line item's quantity
#[instrument(skip(state, headers, body), fields(item_id = %item_id))]
pub async fn update_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
    Json(body): Json<UpdateItemBody>,
) -> Result<Json<CartResponse>, HandlerError> {
    let session = session_from_headers(&headers)?;
    let mut store = open_store(&state, session).await?;

    store
        .update_quantity(&item_id, body.quantity)
        .await
        .map_err(mutation_error_to_response)?;

    Ok(cart_response(&store))
}

/// Remove a line item (idempotent)
#[instrument(skip(state, headers), fields(item_id = %item_id))]
pub async fn remove_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
) -> Result<Json<CartResponse>, HandlerError> {
    let session = session_from_headers(&headers)?;
    let mut store = open_store(&state, session).await?;

    store
        .remove_from_cart(&item_id)
        .await
        .map_err(mutation_error_to_response)?;

    Ok(cart_response(&store))
}

/// Move a line item to the wishlist.
///
/// A wishlist failure after the remove succeeded is reported in the
/// outcome, not rolled back.
#[instrument(skip(state, headers, body), fields(item_id = %item_id))]
pub async fn move_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
    Json(body): Json<MoveItemBody>,
) -> Result<Json<MoveResponse>, HandlerError> {
    let session = session_from_headers(&headers)?;
    let mut store = open_store(&state, session).await?;

    let outcome = store
        .move_to_wishlist(&item_id, &body.product_id)
        .await
        .map_err(mutation_error_to_response)?;

    if let MoveOutcome::RemovedOnly { wishlist_error } = &outcome {
        warn!("Item {} left the cart but not into the wishlist: {}", item_id, wishlist_error);
    }

    Ok(Json(MoveResponse {
        outcome,
        cart: store.cart().clone(),
        breakdown: store.breakdown().clone(),
    }))
}

/// Compute the authoritative quote for this cart, optionally applying
/// a coupon code first.
///
/// Checkout and payment read `payable` from this response; nothing
/// else recomputes it.
#[instrument(skip(state, headers, body))]
pub async fn quote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<QuoteRequest>,
) -> Result<Json<Quote>, HandlerError> {
    let session = session_from_headers(&headers)?;
    let mut store = open_store(&state, session).await?;

    if let Some(code) = &body.coupon_code {
        store
            .apply_coupon(code)
            .await
            .map_err(coupon_error_to_response)?;
    }

    Ok(Json(store.quote()))
}

/// List the coupons available to the signed-in user
#[instrument(skip(state, headers))]
pub async fn list_coupons(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HandlerError> {
    let session = session_from_headers(&headers)?;

    let records = state
        .backend
        .get_all_coupons(&session)
        .await
        .map_err(coupon_error_to_response)?;
    let coupons = Coupon::from_records(records);

    Ok(Json(serde_json::json!({
        "count": coupons.len(),
        "coupons": coupons,
    })))
}

/// Merchant checkout settings, degrading to zero-cost defaults when
/// the settings endpoint is unavailable
#[instrument(skip(state))]
pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    let settings = match state.backend.get_settings().await {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Settings fetch failed, serving zero-cost defaults: {}", e);
            Settings::default()
        }
    };
    Json(settings)
}

//! # Commerce API Client
//!
//! `CartBackend` implementation over the commerce REST API.
//! Wire payloads are loosely typed JSON; they are converted into the
//! domain types at this boundary, and remote failures are mapped into
//! the typed error taxonomy.

use crate::config::RemoteConfig;
use async_trait::async_trait;
use cart_core::{
    AddItemRequest, Cart, CartBackend, CartMutationError, CartResult, CouponError, CouponRecord,
    Currency, LineItem, Price, Product, SessionContext, Settings, SettingsFetchError,
};
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

/// HTTP client for the remote cart, wishlist, coupon, and settings
/// endpoints of the commerce API
pub struct HttpCartBackend {
    config: RemoteConfig,
    client: Client,
}

impl HttpCartBackend {
    /// Create a client from configuration
    pub fn new(config: RemoteConfig) -> CartResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CartMutationError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CartResult<Self> {
        let config = RemoteConfig::from_env()?;
        Self::new(config)
    }

    /// Attach the service key and, when present, the session's user
    /// token to a request
    fn with_auth(&self, builder: RequestBuilder, session: &SessionContext) -> RequestBuilder {
        let builder = builder.header("X-Api-Key", &self.config.api_key);
        match &session.auth_token {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Send a mutation with a fresh idempotency request id and map the
    /// response status into the error taxonomy
    async fn send_mutation(&self, builder: RequestBuilder) -> CartResult<()> {
        let response = builder
            .header("X-Request-Id", Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|e| CartMutationError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(mutation_error(status, read_body(response).await?))
    }
}

/// Drain a response body, mapping transport failures
async fn read_body(response: Response) -> CartResult<String> {
    response
        .text()
        .await
        .map_err(|e| CartMutationError::Network(e.to_string()))
}

/// Map a non-2xx commerce API response into a typed mutation error
fn mutation_error(status: StatusCode, body: String) -> CartMutationError {
    error!("Commerce API error: status={}, body={}", status, body);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return CartMutationError::Unauthorized;
    }

    let reason = serde_json::from_str::<ApiErrorPayload>(&body)
        .ok()
        .and_then(|payload| payload.message())
        .unwrap_or_else(|| format!("HTTP {}", status));

    CartMutationError::Rejected { reason }
}

#[async_trait]
impl CartBackend for HttpCartBackend {
    #[instrument(skip(self, session), fields(cart_id = %session.cart_id))]
    async fn fetch_cart(&self, session: &SessionContext) -> CartResult<Cart> {
        let url = self.config.url(&format!("/v1/carts/{}", session.cart_id));
        let response = self
            .with_auth(self.client.get(&url), session)
            .send()
            .await
            .map_err(|e| CartMutationError::Network(e.to_string()))?;

        // A cart that does not exist yet is an empty cart, not a failure
        if response.status() == StatusCode::NOT_FOUND {
            debug!("No remote cart yet for {}", session.cart_id);
            return Ok(Cart::empty(session.cart_id.clone()));
        }

        let status = response.status();
        let body = read_body(response).await?;
        if !status.is_success() {
            return Err(mutation_error(status, body));
        }

        let payload: CartPayload = serde_json::from_str(&body)
            .map_err(|e| CartMutationError::Serialization(e.to_string()))?;

        debug!("Fetched cart {} with {} lines", payload.id, payload.items.len());
        Ok(payload.into_cart())
    }

    #[instrument(skip(self, session, request), fields(cart_id = %session.cart_id, product_id = %request.product_id))]
    async fn add_to_cart(
        &self,
        session: &SessionContext,
        request: &AddItemRequest,
    ) -> CartResult<()> {
        let url = self.config.url(&format!("/v1/carts/{}/items", session.cart_id));
        self.send_mutation(self.with_auth(self.client.post(&url), session).json(request))
            .await
    }

    #[instrument(skip(self, session), fields(cart_id = %session.cart_id))]
    async fn remove_from_cart(&self, session: &SessionContext, item_id: &str) -> CartResult<()> {
        let url = self
            .config
            .url(&format!("/v1/carts/{}/items/{}", session.cart_id, item_id));
        let response = self
            .with_auth(self.client.delete(&url), session)
            .header("X-Request-Id", Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|e| CartMutationError::Network(e.to_string()))?;

        let status = response.status();
        // Deleting an item that is already gone is a success
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }

        Err(mutation_error(status, read_body(response).await?))
    }

    #[instrument(skip(self, session), fields(cart_id = %session.cart_id))]
    async fn update_quantity(
        &self,
        session: &SessionContext,
        item_id: &str,
        quantity: u32,
    ) -> CartResult<()> {
        let url = self
            .config
            .url(&format!("/v1/carts/{}/items/{}", session.cart_id, item_id));
        self.send_mutation(
            self.with_auth(self.client.patch(&url), session)
                .json(&serde_json::json!({ "quantity": quantity })),
        )
        .await
    }

    #[instrument(skip(self, session))]
    async fn add_to_wishlist(&self, session: &SessionContext, product_id: &str) -> CartResult<()> {
        let user_id = session
            .user_id
            .as_deref()
            .ok_or(CartMutationError::Unauthorized)?;

        let url = self.config.url(&format!("/v1/users/{}/wishlist", user_id));
        self.send_mutation(
            self.with_auth(self.client.post(&url), session)
                .json(&serde_json::json!({ "product_id": product_id })),
        )
        .await
    }

    #[instrument(skip(self, session))]
    async fn get_all_coupons(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<CouponRecord>, CouponError> {
        if !session.is_authenticated() {
            return Err(CouponError::AuthRequired);
        }

        let url = self.config.url("/v1/coupons");
        let response = self
            .with_auth(self.client.get(&url), session)
            .send()
            .await
            .map_err(|e| CouponError::Malformed {
                reason: format!("coupon catalog unreachable: {}", e),
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CouponError::AuthRequired);
        }
        if !status.is_success() {
            return Err(CouponError::Malformed {
                reason: format!("coupon catalog HTTP {}", status),
            });
        }

        let payload: CouponsPayload =
            response
                .json()
                .await
                .map_err(|e| CouponError::Malformed {
                    reason: format!("coupon catalog payload: {}", e),
                })?;

        debug!("Fetched {} coupon records", payload.coupons.len());
        Ok(payload.coupons)
    }

    #[instrument(skip(self))]
    async fn get_settings(&self) -> Result<Settings, SettingsFetchError> {
        let url = self.config.url("/v1/settings");
        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| SettingsFetchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SettingsFetchError::Network(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let payload: SettingsPayload = response
            .json()
            .await
            .map_err(|e| SettingsFetchError::Serialization(e.to_string()))?;

        Ok(payload.into_settings())
    }
}

impl HttpCartBackend {
    /// Fetch settings, degrading to zero-cost defaults on any failure.
    /// Checkout must never block on the settings endpoint.
    pub async fn settings_or_default(&self) -> Settings {
        match self.get_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Settings fetch failed, using zero-cost defaults: {}", e);
                Settings::default()
            }
        }
    }
}

// =============================================================================
// Wire payloads
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApiErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<InnerError>,
}

#[derive(Debug, Deserialize)]
struct InnerError {
    message: String,
}

impl ApiErrorPayload {
    fn message(self) -> Option<String> {
        self.error.map(|e| e.message).or(self.message)
    }
}

#[derive(Debug, Deserialize)]
struct CartPayload {
    id: String,
    #[serde(default)]
    items: Vec<LineItemPayload>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl CartPayload {
    fn into_cart(self) -> Cart {
        Cart {
            id: self.id,
            items: self.items.into_iter().map(LineItemPayload::into_item).collect(),
            updated_at: self.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LineItemPayload {
    id: String,
    product: ProductPayload,
    variant_id: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    size: Option<String>,
    quantity: u32,
}

impl LineItemPayload {
    fn into_item(self) -> LineItem {
        let currency = Currency::default();
        let unit_price = Price::new(self.product.price, currency);
        let unit_discount_price = self.product.discount_price.map(|d| Price::new(d, currency));

        LineItem {
            id: self.id,
            product: Product {
                id: self.product.id,
                name: self.product.name,
                category_id: self.product.category_id,
                price: unit_price,
                discount_price: unit_discount_price,
                image_url: self.product.image_url,
            },
            variant_id: self.variant_id,
            color: self.color,
            size: self.size,
            quantity: self.quantity.max(1),
            unit_price,
            unit_discount_price,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductPayload {
    id: String,
    name: String,
    category_id: String,
    price: f64,
    #[serde(default)]
    discount_price: Option<f64>,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CouponsPayload {
    #[serde(default)]
    coupons: Vec<CouponRecord>,
}

#[derive(Debug, Deserialize)]
struct SettingsPayload {
    #[serde(default)]
    platform_fee: f64,
    #[serde(default)]
    shipping_fee: f64,
    #[serde(default)]
    free_shipping_threshold: f64,
}

impl SettingsPayload {
    fn into_settings(self) -> Settings {
        let currency = Currency::default();
        Settings {
            platform_fee: Price::new(self.platform_fee, currency),
            shipping_fee: Price::new(self.shipping_fee, currency),
            free_shipping_threshold: Price::new(self.free_shipping_threshold, currency),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend(server: &MockServer) -> HttpCartBackend {
        let config = RemoteConfig::new(server.uri(), "key_test").with_timeout(5);
        HttpCartBackend::new(config).unwrap()
    }

    fn session() -> SessionContext {
        SessionContext::authenticated("cart-1", "u-1", "tok-1")
    }

    #[tokio::test]
    async fn test_fetch_cart_parses_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/carts/cart-1"))
            .and(header("X-Api-Key", "key_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cart-1",
                "items": [{
                    "id": "li-1",
                    "product": {
                        "id": "p-1",
                        "name": "Cotton Kurta",
                        "category_id": "cat-apparel",
                        "price": 1299.0,
                        "discount_price": 999.0
                    },
                    "variant_id": "v-m",
                    "size": "M",
                    "quantity": 2
                }],
                "updated_at": "2026-08-01T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let cart = backend(&server).await.fetch_cart(&session()).await.unwrap();

        assert_eq!(cart.id, "cart-1");
        assert_eq!(cart.item_count(), 2);
        let item = cart.find_item("li-1").unwrap();
        assert_eq!(item.unit_price.amount, 129_900);
        assert_eq!(item.effective_unit_price().amount, 99_900);
        assert_eq!(item.size.as_deref(), Some("M"));
    }

    #[tokio::test]
    async fn test_fetch_missing_cart_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/carts/cart-1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let cart = backend(&server).await.fetch_cart(&session()).await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.id, "cart-1");
    }

    #[tokio::test]
    async fn test_add_rejection_maps_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/carts/cart-1/items"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({ "error": { "message": "out of stock" } })),
            )
            .mount(&server)
            .await;

        let request = AddItemRequest {
            product_id: "p-1".to_string(),
            variant_id: "v-1".to_string(),
            quantity: 1,
            size: None,
        };
        let err = backend(&server)
            .await
            .add_to_cart(&session(), &request)
            .await
            .unwrap_err();

        match err {
            CartMutationError::Rejected { reason } => assert_eq!(reason, "out of stock"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_remove_absent_item_is_noop() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/carts/cart-1/items/li-9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        backend(&server)
            .await
            .remove_from_cart(&session(), "li-9")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_coupons_require_auth_token() {
        let server = MockServer::start().await;
        let err = backend(&server)
            .await
            .get_all_coupons(&SessionContext::anonymous("cart-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, CouponError::AuthRequired));
    }

    #[tokio::test]
    async fn test_coupons_sent_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/coupons"))
            .and(header("Authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "coupons": [{
                    "code": "festive50",
                    "offer_type": "percentage",
                    "offer_value": 50.0,
                    "scope": "category",
                    "applicable_ids": ["cat-apparel"]
                }]
            })))
            .mount(&server)
            .await;

        let records = backend(&server)
            .await
            .get_all_coupons(&session())
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "festive50");
    }

    #[tokio::test]
    async fn test_settings_fail_open() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/settings"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = backend(&server).await;
        assert!(client.get_settings().await.is_err());

        let settings = client.settings_or_default().await;
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_settings_parsed_into_minor_units() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "platform_fee": 20.0,
                "shipping_fee": 50.0,
                "free_shipping_threshold": 1000.0
            })))
            .mount(&server)
            .await;

        let settings = backend(&server).await.get_settings().await.unwrap();
        assert_eq!(settings.shipping_fee.amount, 5_000);
        assert_eq!(settings.free_shipping_threshold.amount, 100_000);
        assert_eq!(settings.platform_fee.amount, 2_000);
    }
}

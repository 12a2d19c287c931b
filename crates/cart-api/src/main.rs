//! # Bazaar-Cart RS
//!
//! Storefront cart and pricing service.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export COMMERCE_API_BASE_URL=https://api.example-bazaar.io
//! export COMMERCE_API_KEY=key_live_...
//!
//! # Run the server
//! bazaar-cart
//! ```

use cart_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🛒 Bazaar-Cart starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("🧾 Quote: POST http://{}/api/v1/cart/quote", addr);
        info!("🎟️ Coupons: GET http://{}/api/v1/coupons", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🛒 Bazaar-Cart RS 🛒
  ━━━━━━━━━━━━━━━━━━━━━
  Cart pricing & coupon engine
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}

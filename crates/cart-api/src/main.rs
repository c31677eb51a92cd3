//! # Relief-Cart RS
//!
//! Checkout engine for the Relief Pharmacy storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export GATEWAY_API_URL=http://localhost:4000
//! export STOREFRONT_API_URL=http://localhost:3000
//!
//! # Run the server
//! relief-cart
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
    info!("Gateway API: {}", state.config.gateway.gateway_base_url);
    info!("Storefront API: {}", state.config.gateway.backend_base_url);
    info!("Payment gateways: {:?}", state.gateways.gateways());

    let app = routes::create_router(state);

    info!("Relief-Cart starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Checkout: POST http://{}/api/v1/checkout/paygate", addr);
        info!("Invoices: POST http://{}/api/v1/invoices", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Relief-Cart RS
  --------------
  ZAR checkout engine
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}

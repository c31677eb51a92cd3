//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - API:
///   - GET  /api/v1/products - Product catalog (proxied)
///   - GET  /api/v1/shipping - Shipping methods and quotes
///   - POST /api/v1/checkout/{gateway} - Start a payment handoff
///   - POST /api/v1/invoices - Create an invoice
///   - GET  /api/v1/invoices/{reference}/html - Printable invoice
///   - GET  /api/v1/orders/{reference} - Single status probe
///   - GET  /api/v1/orders/{reference}/wait - Bounded long-poll
///
/// - Pages:
///   - GET /order/processing?ref=... - Processing/resume page
///   - GET /checkout/success - Success page
///   - GET /checkout/cancel - Cancel page
pub fn create_router(state: AppState) -> Router {
    // The storefront is served from a different origin in development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let checkout_routes = Router::new()
        .route("/success", get(handlers::checkout_success))
        .route("/cancel", get(handlers::checkout_cancel));

    let api_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/shipping", get(handlers::shipping_options))
        .route("/checkout/{gateway}", post(handlers::create_checkout))
        .route("/invoices", post(handlers::create_invoice))
        .route("/invoices/{reference}/html", get(handlers::invoice_document))
        .route("/orders/{reference}", get(handlers::order_status))
        .route("/orders/{reference}/wait", get(handlers::order_wait));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/checkout", checkout_routes)
        .route("/order/processing", get(handlers::order_processing))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

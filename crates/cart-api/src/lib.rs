//! # cart-api
//!
//! HTTP API layer for relief-cart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Payment handoff endpoints (PayGate, Ozow)
//! - Invoice creation and order-status endpoints
//! - The session-scoped handoff store behind the processing page
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/products` | Product catalog (proxied) |
//! | GET | `/api/v1/shipping` | Shipping methods and quotes |
//! | POST | `/api/v1/checkout/{gateway}` | Start a payment handoff |
//! | POST | `/api/v1/invoices` | Create an invoice |
//! | GET | `/api/v1/invoices/{reference}/html` | Printable invoice |
//! | GET | `/api/v1/orders/{reference}` | Single status probe |
//! | GET | `/api/v1/orders/{reference}/wait` | Bounded long-poll |
//! | GET | `/order/processing` | Processing/resume page |
//! | GET | `/checkout/success` | Success page |
//! | GET | `/checkout/cancel` | Cancel page |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, HandoffEntry, HandoffStore};

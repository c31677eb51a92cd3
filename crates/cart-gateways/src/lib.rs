//! # cart-gateways
//!
//! Payment gateway integrations for relief-cart.
//!
//! This crate provides two gateway implementations behind the
//! `PaymentGateway` trait from `cart-core`:
//!
//! 1. **PayGateGateway** - card payments via PayGate's PayWeb page.
//!    The backend signs the request and returns the hidden form fields
//!    plus `SIGNATURE`/`SIGNATURE_METHOD`.
//!
//! 2. **OzowGateway** - instant EFT via Ozow. The backend returns the
//!    form action and pre-signed fields; no separate signature fields.
//!
//! It also carries the surrounding checkout plumbing:
//! - `BackendClient` for the storefront products/invoices API
//! - `CheckoutFlow` orchestration with double-submit protection
//! - `poll_invoice` for bounded payment confirmation polling
//! - redirect form and printable invoice HTML rendering
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_gateways::{CheckoutFlow, PayGateGateway, render_redirect_form};
//! use std::sync::Arc;
//!
//! let gateway = Arc::new(PayGateGateway::from_env()?);
//! let flow = CheckoutFlow::new(gateway);
//!
//! let initiation = flow.execute(cart.state(), &customer).await?;
//! let html = render_redirect_form(&initiation);
//! // Serve html; the browser POSTs itself to the gateway
//! ```

pub mod backend;
pub mod checkout;
pub mod client;
pub mod config;
pub mod form;
pub mod invoice_html;
pub mod ozow;
pub mod paygate;
pub mod poll;

// Re-exports
pub use backend::BackendClient;
pub use checkout::{CheckoutFlow, ORDER_REFERENCE_PREFIX};
pub use config::GatewayConfig;
pub use form::{escape_html, render_redirect_form};
pub use invoice_html::render_invoice_html;
pub use ozow::{OzowGateway, DEFAULT_OZOW_ACTION};
pub use paygate::{PayGateGateway, DEFAULT_PAYGATE_ENDPOINT, DEFAULT_SIGNATURE_METHOD};
pub use poll::{poll_invoice, PollPolicy};

//! # cart-core
//!
//! Core types for the relief-cart checkout engine.
//!
//! This crate provides:
//! - ZAR currency formatting/parsing utilities
//! - The fixed shipping catalog and free-shipping eligibility rule
//! - `CartStore` with a pure action reducer and derived totals
//! - `Invoice` types and payload building
//! - The `PaymentGateway` trait implemented by gateway integrations
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use cart_core::{CartItem, CartStore, ShippingMethodId};
//!
//! let mut cart = CartStore::new();
//! cart.add_item(CartItem {
//!     id: "cr-001".into(),
//!     name: "Heat Rub 50ml".into(),
//!     unit_price: 249.0,
//!     quantity: 1,
//!     image_url: String::new(),
//! });
//! cart.set_shipping(ShippingMethodId::Collection);
//!
//! assert_eq!(cart.grand_total(), 308.0);
//! ```

pub mod cart;
pub mod currency;
pub mod error;
pub mod gateway;
pub mod invoice;
pub mod product;
pub mod shipping;

// Re-exports for convenience
pub use cart::{reduce, CartAction, CartItem, CartState, CartStore};
pub use currency::{format_zar, format_zar_str, from_cents, parse_zar, round_to_cents, to_cents};
pub use error::{CheckoutError, CheckoutResult};
pub use gateway::{
    generate_order_reference, BoxedPaymentGateway, GatewaySelector, InitiationRequest,
    PaymentGateway, PaymentInitiation,
};
pub use invoice::{
    build_invoice_payload, CustomerDetails, Invoice, InvoiceLine, InvoicePayload, InvoiceStatus,
};
pub use product::Product;
pub use shipping::{
    available_methods, calculate_shipping, calculate_shipping_for, shipping_method,
    shipping_method_name, shipping_methods, ShippingMethod, ShippingMethodId,
    FALLBACK_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD,
};

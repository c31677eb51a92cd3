//! # Request Handlers
//!
//! Axum request handlers for the checkout API. The JSON surface mirrors
//! what the storefront sends: a cart snapshot plus customer details.
//! Totals are always recomputed server-side through the cart store, the
//! client's own arithmetic is never trusted.

use crate::state::{AppState, HandoffEntry};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use cart_core::{
    build_invoice_payload, generate_order_reference, CartItem, CartStore, CheckoutError,
    CustomerDetails, InitiationRequest, InvoiceStatus, ShippingMethodId,
};
use cart_gateways::{
    poll_invoice, render_invoice_html, render_redirect_form, CheckoutFlow, PollPolicy,
    ORDER_REFERENCE_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// One cart line as the storefront sends it
#[derive(Debug, Deserialize)]
pub struct CartLineRequest {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub image_url: String,
}

fn default_quantity() -> u32 {
    1
}

/// Checkout request: cart snapshot + customer
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CartLineRequest>,
    /// Shipping method id ("standard", "express", "collection", "free")
    #[serde(default)]
    pub shipping: Option<String>,
    pub customer: CustomerDetails,
}

/// Invoice creation request
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub items: Vec<CartLineRequest>,
    #[serde(default)]
    pub shipping: Option<String>,
    pub customer: CustomerDetails,
    /// Set to "ozow" to stage a payment handoff for the processing page
    #[serde(default)]
    pub pay_with: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    /// `json` returns the raw initiation instead of the redirect form
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProcessingQuery {
    #[serde(rename = "ref")]
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShippingQuery {
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub method: Option<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Rebuild a server-side cart from the request snapshot. Quantities and
/// totals go through the reducer so all pricing rules apply.
fn build_cart(state: &AppState, items: &[CartLineRequest], shipping: Option<&str>) -> Result<CartStore, ApiError> {
    let mut cart = CartStore::new();
    if let Some(id) = &state.config.test_product_id {
        cart = cart.with_test_product_id(id.clone());
    }

    for line in items {
        // Unit prices are non-negative by contract; a bad price must
        // not reach the reducer or a gateway initiation
        if !line.price.is_finite() || line.price < 0.0 {
            return Err(checkout_error_to_response(CheckoutError::Validation(
                format!("Invalid unit price for {}: {}", line.id, line.price),
            )));
        }
        cart.add_item(CartItem {
            id: line.id.clone(),
            name: line.name.clone(),
            unit_price: line.price,
            quantity: 1,
            image_url: line.image_url.clone(),
        });
        if line.quantity > 1 {
            cart.update_quantity(&line.id, line.quantity);
        }
    }

    if let Some(method) = shipping {
        let method: ShippingMethodId = method.parse().map_err(|_| {
            checkout_error_to_response(CheckoutError::Validation(format!(
                "Unknown shipping method: {}",
                method
            )))
        })?;
        cart.set_shipping(method);
    }

    Ok(cart)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "relief-cart",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Product catalog, proxied from the storefront backend
pub async fn list_products(State(state): State<AppState>) -> Result<Response, ApiError> {
    let products = state
        .backend
        .get_products()
        .await
        .map_err(checkout_error_to_response)?;
    Ok(Json(serde_json::json!({
        "products": products,
        "count": products.len()
    }))
    .into_response())
}

/// Shipping methods selectable for a subtotal, with an optional quote
/// for a raw method id
pub async fn shipping_options(Query(query): Query<ShippingQuery>) -> impl IntoResponse {
    let methods = cart_core::available_methods(query.subtotal);
    let quote = query
        .method
        .as_deref()
        .map(|m| cart_core::calculate_shipping_for(query.subtotal, m));

    Json(serde_json::json!({
        "subtotal": query.subtotal,
        "free_shipping_threshold": cart_core::FREE_SHIPPING_THRESHOLD,
        "methods": methods,
        "quote": quote
    }))
}

/// Start a payment handoff for the named gateway.
///
/// Default response is the auto-submitting redirect form as HTML;
/// `?format=json` returns the raw initiation for clients that render
/// their own form. A fieldless initiation becomes a plain 303.
#[instrument(skip(state, request), fields(gateway = %gateway, items = request.items.len()))]
pub async fn create_checkout(
    State(state): State<AppState>,
    Path(gateway): Path<String>,
    Query(query): Query<FormatQuery>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Response, ApiError> {
    let gateway = state.gateway(&gateway).ok_or_else(|| {
        checkout_error_to_response(CheckoutError::GatewayNotFound { gateway })
    })?;

    let cart = build_cart(&state, &request.items, request.shipping.as_deref())?;

    let flow = CheckoutFlow::new(gateway.clone());
    let initiation = flow
        .execute(cart.state(), &request.customer)
        .await
        .map_err(|e| {
            error!("Checkout failed: {}", e);
            checkout_error_to_response(e)
        })?;

    info!(
        "Checkout initiated: order_id={}, endpoint={}",
        initiation.order_id, initiation.endpoint
    );

    if query.format.as_deref() == Some("json") {
        return Ok(Json(initiation).into_response());
    }

    if initiation.fields.is_empty() && initiation.signature.is_none() {
        return Ok(Redirect::to(&initiation.endpoint).into_response());
    }

    Ok(Html(render_redirect_form(&initiation)).into_response())
}

/// Build and submit an invoice for the cart.
///
/// With `pay_with: "ozow"` a handoff entry is staged so the processing
/// page can auto-resume the payment after the customer returns.
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Response, ApiError> {
    let cart = build_cart(&state, &request.items, request.shipping.as_deref())?;

    let payload = build_invoice_payload(cart.state(), &request.customer)
        .map_err(checkout_error_to_response)?;

    let invoice = state
        .backend
        .create_invoice(&payload)
        .await
        .map_err(|e| {
            error!("Invoice creation failed: {}", e);
            checkout_error_to_response(e)
        })?;

    info!("Invoice created: {}", invoice.invoice_number);

    let processing_url = if request.pay_with.as_deref() == Some("ozow") {
        state.handoff.put(
            &invoice.invoice_number,
            HandoffEntry {
                amount: invoice.total,
                customer: request.customer.clone(),
            },
        );
        Some(format!("/order/processing?ref={}", invoice.invoice_number))
    } else {
        None
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "invoice": invoice,
        "processing_url": processing_url
    }))
    .into_response())
}

/// Single status probe for an invoice, used by the processing page
#[instrument(skip(state))]
pub async fn order_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Response, ApiError> {
    let invoice = state
        .backend
        .find_invoice(&reference)
        .await
        .map_err(checkout_error_to_response)?
        .ok_or_else(|| {
            checkout_error_to_response(CheckoutError::InvoiceNotFound {
                reference: reference.clone(),
            })
        })?;

    let paid = invoice.status == InvoiceStatus::Completed;
    if paid {
        // Payment confirmed; any staged handoff is obsolete
        state.handoff.discard(&reference);
    }

    Ok(Json(serde_json::json!({
        "reference": reference,
        "status": invoice.status,
        "paid": paid,
        "invoice": invoice
    }))
    .into_response())
}

/// Bounded long-poll: hold the request open until the invoice completes
/// or the wait policy is exhausted (504)
#[instrument(skip(state))]
pub async fn order_wait(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Response, ApiError> {
    // Short server-side policy; the page re-issues the wait on timeout
    let policy = PollPolicy::new(Duration::from_secs(2), 15);
    let invoice = poll_invoice(&state.backend, &reference, &policy)
        .await
        .map_err(checkout_error_to_response)?;

    state.handoff.discard(&reference);
    Ok(Json(serde_json::json!({
        "reference": reference,
        "status": invoice.status,
        "paid": true,
        "invoice": invoice
    }))
    .into_response())
}

/// Printable invoice document
#[instrument(skip(state))]
pub async fn invoice_document(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Response, ApiError> {
    let invoice = state
        .backend
        .find_invoice(&reference)
        .await
        .map_err(checkout_error_to_response)?
        .ok_or_else(|| {
            checkout_error_to_response(CheckoutError::InvoiceNotFound {
                reference: reference.clone(),
            })
        })?;

    Ok(Html(render_invoice_html(&invoice)).into_response())
}

/// Order processing page.
///
/// A staged Ozow handoff entry is consumed (read-once) and turned into
/// a fresh initiation plus redirect form; a page refresh therefore
/// cannot double-initiate. Without an entry the page reports current
/// status and refreshes itself until the payment confirms.
#[instrument(skip(state, query))]
pub async fn order_processing(
    State(state): State<AppState>,
    Query(query): Query<ProcessingQuery>,
) -> Result<Response, ApiError> {
    let reference = query.reference.ok_or_else(|| {
        checkout_error_to_response(CheckoutError::Validation(
            "Missing 'ref' query parameter".to_string(),
        ))
    })?;

    if let Some(entry) = state.handoff.take(&reference) {
        info!("Resuming Ozow handoff for {}", reference);
        let gateway = state.gateway("ozow").ok_or_else(|| {
            checkout_error_to_response(CheckoutError::GatewayNotFound {
                gateway: "ozow".to_string(),
            })
        })?;

        let request = InitiationRequest::new(
            generate_order_reference(ORDER_REFERENCE_PREFIX),
            entry.amount,
        )
        .with_bank_ref(reference.clone())
        .with_customer(entry.customer.name.clone());

        let initiation = gateway.initiate(&request).await.map_err(|e| {
            error!("Ozow resume failed for {}: {}", reference, e);
            checkout_error_to_response(e)
        })?;

        return Ok(Html(render_redirect_form(&initiation)).into_response());
    }

    let invoice = state
        .backend
        .find_invoice(&reference)
        .await
        .map_err(checkout_error_to_response)?;

    let page = match invoice {
        Some(inv) if inv.status == InvoiceStatus::Completed => processing_page(
            &reference,
            "Payment confirmed",
            "Your payment has been received. Thank you for your order.",
            false,
        ),
        Some(inv) => processing_page(
            &reference,
            "Processing your payment",
            &format!("Current status: {}. This page refreshes automatically.", inv.status.as_str()),
            true,
        ),
        None => processing_page(
            &reference,
            "Waiting for your order",
            "Your order has not been confirmed yet. This page refreshes automatically.",
            true,
        ),
    };

    Ok(Html(page).into_response())
}

fn processing_page(reference: &str, title: &str, message: &str, refresh: bool) -> String {
    let refresh_tag = if refresh {
        r#"<meta http-equiv="refresh" content="5">"#
    } else {
        ""
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    {refresh_tag}
    <title>{title}</title>
</head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #fef2f2;">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center; box-shadow: 0 4px 12px rgba(0,0,0,0.08);">
        <h1 style="color: #dc2626;">{title}</h1>
        <p>Order reference: <code>{reference}</code></p>
        <p style="color: #666;">{message}</p>
    </div>
</body>
</html>
"#,
        refresh_tag = refresh_tag,
        title = cart_gateways::escape_html(title),
        reference = cart_gateways::escape_html(reference),
        message = cart_gateways::escape_html(message),
    )
}

/// Checkout success page
pub async fn checkout_success(Query(query): Query<ProcessingQuery>) -> impl IntoResponse {
    let reference = query.reference.unwrap_or_else(|| "unknown".to_string());
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Payment Successful</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #fef2f2;">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <h1 style="color: #16a34a;">Payment Successful</h1>
        <p>Order reference: <code>{}</code></p>
        <p style="color: #666;">A confirmation email is on its way.</p>
    </div>
</body>
</html>
"#,
        cart_gateways::escape_html(&reference)
    ))
}

/// Checkout cancel page.
///
/// With a `ref` parameter the staged handoff is dropped and a still
/// pending invoice is cancelled on the backend, best effort; the page
/// renders regardless.
pub async fn checkout_cancel(
    State(state): State<AppState>,
    Query(query): Query<ProcessingQuery>,
) -> impl IntoResponse {
    if let Some(reference) = &query.reference {
        state.handoff.discard(reference);

        match state.backend.find_invoice(reference).await {
            Ok(Some(invoice)) if invoice.status == InvoiceStatus::Pending => {
                if let Some(id) = invoice.id {
                    if let Err(e) = state
                        .backend
                        .update_invoice_status(id, InvoiceStatus::Cancelled)
                        .await
                    {
                        error!("Could not cancel invoice {}: {}", reference, e);
                    } else {
                        info!("Invoice {} cancelled", reference);
                    }
                }
            }
            Ok(_) => {}
            Err(e) => error!("Cancel lookup failed for {}: {}", reference, e),
        }
    }

    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Payment Cancelled</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #fef2f2;">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <h1 style="color: #dc2626;">Payment Cancelled</h1>
        <p style="color: #666;">No charges were made. Your cart is unchanged.</p>
    </div>
</body>
</html>
"#,
    )
}

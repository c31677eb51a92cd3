//! # Invoice Types
//!
//! Invoice payload building and the backend-authoritative invoice
//! record. The backend assigns `invoice_number` and owns the status
//! lifecycle; this side only builds payloads and reads results.

use crate::cart::CartState;
use crate::error::{CheckoutError, CheckoutResult};
use crate::currency::round_to_cents;
use crate::shipping::shipping_method_name;
use serde::{Deserialize, Deserializer, Serialize};

/// Customer details collected at checkout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
}

impl CustomerDetails {
    /// Required-field check used before any network call
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(CheckoutError::Validation(
                "Customer name and email address are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// One invoice line: name, quantity, unit price and line total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub total: f64,
}

/// Invoice creation payload, submitted to `POST /invoices`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoicePayload {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: String,
    pub items: Vec<InvoiceLine>,
    pub subtotal: f64,
    pub shipping_cost: f64,
    pub total: f64,
    pub shipping_method: String,
    #[serde(default)]
    pub notes: String,
}

/// Invoice status lifecycle, mutated only by the admin backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Processing => "processing",
            InvoiceStatus::Completed => "completed",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

impl From<String> for InvoiceStatus {
    // Backend status strings vary in case; anything unrecognized reads
    // as pending rather than failing the whole invoice parse.
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "processing" => InvoiceStatus::Processing,
            "completed" => InvoiceStatus::Completed,
            "cancelled" => InvoiceStatus::Cancelled,
            _ => InvoiceStatus::Pending,
        }
    }
}

impl From<InvoiceStatus> for String {
    fn from(s: InvoiceStatus) -> Self {
        s.as_str().to_string()
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Pending
    }
}

/// The backend serializes money either as numbers or as strings
/// depending on its storage layer; accept both.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => Ok(s.trim().parse::<f64>().unwrap_or(0.0)),
    }
}

/// A backend-authoritative invoice record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Backend row id, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Authoritative order identifier, assigned by the backend
    pub invoice_number: String,

    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: String,

    #[serde(default)]
    pub items: Vec<InvoiceLine>,

    #[serde(deserialize_with = "lenient_f64")]
    pub subtotal: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub shipping_cost: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total: f64,

    #[serde(default)]
    pub status: InvoiceStatus,

    #[serde(default)]
    pub shipping_method: String,

    #[serde(default)]
    pub notes: String,

    /// Creation timestamp as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Invoice {
    /// Whether this reference matches the invoice (number or row id)
    pub fn matches_reference(&self, reference: &str) -> bool {
        self.invoice_number == reference
            || self.id.map(|id| id.to_string() == reference).unwrap_or(false)
    }
}

/// Build an invoice payload from cart contents and customer input.
///
/// Line totals are computed client-side and must match what the
/// backend computes; the backend remains the source of truth for the
/// authoritative totals.
pub fn build_invoice_payload(
    cart: &CartState,
    customer: &CustomerDetails,
) -> CheckoutResult<InvoicePayload> {
    if cart.is_empty() {
        return Err(CheckoutError::Validation(
            "Cannot generate an invoice for an empty cart".to_string(),
        ));
    }
    customer.validate()?;

    let items = cart
        .items
        .iter()
        .map(|item| InvoiceLine {
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.unit_price,
            total: round_to_cents(item.unit_price * item.quantity as f64),
        })
        .collect();

    Ok(InvoicePayload {
        customer_name: customer.name.clone(),
        customer_email: customer.email.clone(),
        customer_phone: customer.phone.clone(),
        customer_address: customer.address.clone(),
        items,
        subtotal: cart.subtotal,
        shipping_cost: cart.shipping_cost,
        total: cart.grand_total,
        shipping_method: shipping_method_name(cart.selected_shipping).to_string(),
        notes: customer.notes.clone(),
    })
}

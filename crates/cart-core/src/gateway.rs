//! # Payment Gateway Trait
//!
//! Strategy trait for payment handoff providers (PayGate, Ozow).
//! A gateway turns an initiation request into the signed form fields
//! the customer's browser must POST to the external payment page. Card
//! data never touches this application.

use crate::error::CheckoutResult;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Request to start a payment handoff
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiationRequest {
    /// Client-generated correlation id; display/tracking only, not the
    /// authoritative order identifier
    pub order_id: String,

    /// Amount to charge, in rands
    pub amount_rands: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Bank reference shown on the customer's statement (Ozow)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_ref: Option<String>,

    /// Customer display name (Ozow)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

impl InitiationRequest {
    pub fn new(order_id: impl Into<String>, amount_rands: f64) -> Self {
        Self {
            order_id: order_id.into(),
            amount_rands,
            currency: None,
            description: None,
            bank_ref: None,
            customer: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_bank_ref(mut self, bank_ref: impl Into<String>) -> Self {
        self.bank_ref = Some(bank_ref.into());
        self
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }
}

/// Everything needed to redirect the customer to the gateway.
///
/// Ephemeral: exists between "request initiation from the backend" and
/// "submit the redirect form"; never persisted beyond the session-
/// scoped handoff cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInitiation {
    /// Correlation id this initiation was created for
    pub order_id: String,

    /// Amount in rands
    pub amount_rands: f64,

    /// Gateway page URL the form posts to
    pub endpoint: String,

    /// Form fields in submission order, exactly as the backend signed
    /// them
    pub fields: Vec<(String, String)>,

    /// Cryptographic signature over the fields, when the gateway
    /// requires one as a separate field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    /// Signature algorithm identifier (e.g. `HMAC-SHA256`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_method: Option<String>,
}

/// Core trait implemented by each payment gateway integration
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Request signed redirect-form fields for this payment.
    ///
    /// Network and protocol failures surface as typed errors; a body
    /// that is not the expected JSON must become
    /// `CheckoutError::UnexpectedResponse`, never a panic.
    async fn initiate(&self, request: &InitiationRequest) -> CheckoutResult<PaymentInitiation>;

    /// Gateway name for logging and routing
    fn gateway_name(&self) -> &'static str;
}

/// Type alias for a boxed gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

/// Selector for multiple registered gateways
#[derive(Clone, Default)]
pub struct GatewaySelector {
    gateways: std::collections::HashMap<String, BoxedPaymentGateway>,
    default_gateway: String,
}

impl GatewaySelector {
    pub fn new(default_gateway: impl Into<String>) -> Self {
        Self {
            gateways: std::collections::HashMap::new(),
            default_gateway: default_gateway.into(),
        }
    }

    pub fn register(&mut self, gateway: BoxedPaymentGateway) {
        let name = gateway.gateway_name().to_string();
        self.gateways.insert(name, gateway);
    }

    pub fn with_gateway(mut self, gateway: BoxedPaymentGateway) -> Self {
        self.register(gateway);
        self
    }

    pub fn default_gateway(&self) -> Option<&BoxedPaymentGateway> {
        self.gateways.get(&self.default_gateway)
    }

    pub fn get(&self, name: &str) -> Option<&BoxedPaymentGateway> {
        self.gateways.get(name)
    }

    pub fn get_or_default(&self, name: Option<&str>) -> Option<&BoxedPaymentGateway> {
        match name {
            Some(n) => self.get(n),
            None => self.default_gateway(),
        }
    }

    pub fn gateways(&self) -> Vec<&str> {
        self.gateways.keys().map(|s| s.as_str()).collect()
    }
}

/// Generate a time-based order reference, e.g. `ORDER_1735816342123_a1b2c3d4e`.
///
/// For idempotent tracking and display only; once the backend issues
/// an invoice number, that is the authoritative identifier.
pub fn generate_order_reference(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("{}_{}_{}", prefix, millis, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_reference_format() {
        let reference = generate_order_reference("ORDER");
        let parts: Vec<_> = reference.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORDER");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }

    #[test]
    fn test_order_references_are_distinct() {
        let a = generate_order_reference("ORDER");
        let b = generate_order_reference("ORDER");
        assert_ne!(a, b);
    }

    #[test]
    fn test_initiation_request_wire_shape() {
        let request = InitiationRequest::new("ORDER_1_abc", 597.0)
            .with_bank_ref("INV-1001")
            .with_customer("Thandi Nkosi");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["orderId"], "ORDER_1_abc");
        assert_eq!(json["amountRands"], 597.0);
        assert_eq!(json["bankRef"], "INV-1001");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_selector_empty() {
        let selector = GatewaySelector::new("paygate");
        assert!(selector.default_gateway().is_none());
        assert!(selector.get_or_default(None).is_none());
        assert_eq!(selector.gateways().len(), 0);
    }
}

//! # Ozow Initiation
//!
//! Instant EFT via Ozow. Like PayGate, the storefront backend owns the
//! site code and hashing; the response here is just the form field set
//! for `https://pay.ozow.com`. Ozow carries its hash inside the field
//! set, so no separate signature fields are appended.

use crate::client::{form_value, http_client, parse_json, read_body};
use crate::config::GatewayConfig;
use async_trait::async_trait;
use cart_core::{
    CheckoutError, CheckoutResult, InitiationRequest, PaymentGateway, PaymentInitiation,
};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, error, info, instrument};

/// Ozow payment page, used when the backend omits an action URL
pub const DEFAULT_OZOW_ACTION: &str = "https://pay.ozow.com";

/// Ozow instant-EFT handoff via the backend's `/ozow/initiate` endpoint
pub struct OzowGateway {
    config: GatewayConfig,
    client: Client,
}

impl OzowGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            client: http_client(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Ok(Self::new(GatewayConfig::from_env()?))
    }
}

#[derive(Debug, Deserialize)]
struct OzowInitiateResponse {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    fields: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
impl PaymentGateway for OzowGateway {
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    async fn initiate(&self, request: &InitiationRequest) -> CheckoutResult<PaymentInitiation> {
        let url = self.config.gateway_endpoint("/ozow/initiate");
        debug!(
            "Requesting Ozow form fields: amount={}, bank_ref={:?}",
            request.amount_rands, request.bank_ref
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        let (status, body) = read_body(response).await?;

        if !status.is_success() {
            error!("Ozow initiate failed: status={}, body={}", status, body);
            return Err(CheckoutError::Gateway {
                gateway: "ozow".to_string(),
                message: format!("HTTP {}: {}", status, crate::client::body_snippet(&body)),
            });
        }

        let parsed: OzowInitiateResponse = parse_json("ozow", &body)?;

        let fields = parsed
            .fields
            .filter(|f| !f.is_empty())
            .ok_or_else(|| CheckoutError::Gateway {
                gateway: "ozow".to_string(),
                message: parsed
                    .message
                    .unwrap_or_else(|| "Initiation returned no form fields".to_string()),
            })?;

        let endpoint = parsed
            .action
            .unwrap_or_else(|| DEFAULT_OZOW_ACTION.to_string());

        info!("Ozow initiation ready: action={}, fields={}", endpoint, fields.len());

        Ok(PaymentInitiation {
            order_id: request.order_id.clone(),
            amount_rands: request.amount_rands,
            endpoint,
            fields: fields
                .iter()
                .map(|(k, v)| (k.clone(), form_value(v)))
                .collect(),
            signature: None,
            signature_method: None,
        })
    }

    fn gateway_name(&self) -> &'static str {
        "ozow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> OzowGateway {
        OzowGateway::new(GatewayConfig::new(server.uri(), server.uri()))
    }

    #[tokio::test]
    async fn test_initiate_carries_bank_ref_and_customer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ozow/initiate"))
            .and(body_partial_json(serde_json::json!({
                "orderId": "INV-1001",
                "amountRands": 597.0,
                "bankRef": "INV-1001",
                "customer": "Thandi Nkosi"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "action": "https://pay.ozow.com",
                "fields": {
                    "SiteCode": "REL-001",
                    "TransactionReference": "INV-1001",
                    "Amount": "597.00",
                    "HashCheck": "f00dfeed"
                }
            })))
            .mount(&server)
            .await;

        let request = InitiationRequest::new("INV-1001", 597.0)
            .with_bank_ref("INV-1001")
            .with_customer("Thandi Nkosi");
        let initiation = gateway_for(&server).initiate(&request).await.unwrap();

        assert_eq!(initiation.endpoint, DEFAULT_OZOW_ACTION);
        assert!(initiation.signature.is_none());
        assert!(initiation
            .fields
            .iter()
            .any(|(k, v)| k == "TransactionReference" && v == "INV-1001"));
    }

    #[tokio::test]
    async fn test_missing_fields_is_a_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ozow/initiate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "site code missing"
            })))
            .mount(&server)
            .await;

        let request = InitiationRequest::new("INV-1001", 597.0);
        let err = gateway_for(&server).initiate(&request).await.unwrap_err();
        match err {
            CheckoutError::Gateway { gateway, message } => {
                assert_eq!(gateway, "ozow");
                assert!(message.contains("site code missing"));
            }
            other => panic!("expected Gateway error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_html_body_surfaces_unexpected_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ozow/initiate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<!DOCTYPE html><html>"))
            .mount(&server)
            .await;

        let request = InitiationRequest::new("INV-1001", 597.0);
        let err = gateway_for(&server).initiate(&request).await.unwrap_err();
        assert!(matches!(err, CheckoutError::UnexpectedResponse { .. }));
    }
}

//! # PayGate Initiation
//!
//! Card payments via PayGate's hosted paypage. The storefront backend
//! holds the merchant credentials and signs the form fields; this
//! client only requests the signed field set and hands it to the
//! redirect form.

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

/// PayGate hosted paypage, used when the backend omits an endpoint
pub const DEFAULT_PAYGATE_ENDPOINT: &str = "https://secure.paygate.co.za/paypage";

/// Signature method appended when the backend does not name one
pub const DEFAULT_SIGNATURE_METHOD: &str = "HMAC-SHA256";

/// PayGate payment handoff via the backend's `/paygate/create` endpoint
pub struct PayGateGateway {
    config: GatewayConfig,
    client: Client,
}

impl PayGateGateway {
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
struct PayGateCreateResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    fields: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    signature: Option<String>,
    #[serde(default)]
    signature_method: Option<String>,
}

#[async_trait]
impl PaymentGateway for PayGateGateway {
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    async fn initiate(&self, request: &InitiationRequest) -> CheckoutResult<PaymentInitiation> {
        let url = self.config.gateway_endpoint("/paygate/create");
        debug!("Requesting PayGate form fields: amount={}", request.amount_rands);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        let (status, body) = read_body(response).await?;

        if !status.is_success() {
            error!("PayGate create failed: status={}, body={}", status, body);
            return Err(CheckoutError::Gateway {
                gateway: "paygate".to_string(),
                message: format!("HTTP {}: {}", status, crate::client::body_snippet(&body)),
            });
        }

        let parsed: PayGateCreateResponse = parse_json("paygate", &body)?;

        if !parsed.success {
            return Err(CheckoutError::Gateway {
                gateway: "paygate".to_string(),
                message: parsed.message.unwrap_or_else(|| "Unknown".to_string()),
            });
        }

        let fields = parsed
            .fields
            .filter(|f| !f.is_empty())
            .ok_or_else(|| CheckoutError::Gateway {
                gateway: "paygate".to_string(),
                message: "Initiation returned no form fields".to_string(),
            })?;

        let endpoint = parsed
            .endpoint
            .unwrap_or_else(|| DEFAULT_PAYGATE_ENDPOINT.to_string());

        info!("PayGate initiation ready: endpoint={}, fields={}", endpoint, fields.len());

        Ok(PaymentInitiation {
            order_id: request.order_id.clone(),
            amount_rands: request.amount_rands,
            endpoint,
            fields: fields
                .iter()
                .map(|(k, v)| (k.clone(), form_value(v)))
                .collect(),
            signature: parsed.signature.filter(|s| !s.is_empty()),
            signature_method: Some(
                parsed
                    .signature_method
                    .unwrap_or_else(|| DEFAULT_SIGNATURE_METHOD.to_string()),
            ),
        })
    }

    fn gateway_name(&self) -> &'static str {
        "paygate"
    }
}

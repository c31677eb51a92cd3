//! # Application State
//!
//! Shared state for the Axum application: server configuration, the
//! registered payment gateways, the storefront backend client and the
//! session handoff store used to resume Ozow order processing.

use cart_core::{BoxedPaymentGateway, CustomerDetails, GatewaySelector};
use cart_gateways::{BackendClient, GatewayConfig, OzowGateway, PayGateGateway};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Gateway and storefront backend base URLs
    pub gateway: GatewayConfig,
    /// Product id whose presence in the cart forces free shipping
    pub test_product_id: Option<String>,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            gateway: GatewayConfig::from_env()?,
            test_product_id: std::env::var("TEST_PRODUCT_ID").ok().filter(|v| !v.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// What the order-processing page needs to resume a payment after the
/// customer comes back from the Ozow redirect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffEntry {
    /// Invoice total in rands
    pub amount: f64,
    /// Customer details captured at checkout
    pub customer: CustomerDetails,
}

/// Session-scoped cache of in-flight Ozow handoffs, keyed by
/// `ozow:init:<invoice_number>`.
///
/// Entries are consumed on read so a refresh of the processing page
/// cannot re-initiate a payment, and are dropped once the invoice
/// completes or the customer abandons the flow.
#[derive(Default)]
pub struct HandoffStore {
    entries: DashMap<String, HandoffEntry>,
}

fn handoff_key(reference: &str) -> String {
    format!("ozow:init:{}", reference)
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pending handoff for an invoice reference
    pub fn put(&self, reference: &str, entry: HandoffEntry) {
        self.entries.insert(handoff_key(reference), entry);
    }

    /// Consume the handoff entry for a reference, if one exists
    pub fn take(&self, reference: &str) -> Option<HandoffEntry> {
        self.entries.remove(&handoff_key(reference)).map(|(_, v)| v)
    }

    /// Drop the entry without reading it (payment completed/abandoned)
    pub fn discard(&self, reference: &str) {
        self.entries.remove(&handoff_key(reference));
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.entries.contains_key(&handoff_key(reference))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway selector (PayGate default, Ozow registered)
    pub gateways: GatewaySelector,
    /// Storefront backend client
    pub backend: BackendClient,
    /// In-flight Ozow handoffs
    pub handoff: Arc<HandoffStore>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create AppState with PayGate and Ozow registered
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Ok(Self::with_config(config))
    }

    /// Build state from explicit config (tests, embedding)
    pub fn with_config(config: AppConfig) -> Self {
        let gateways = GatewaySelector::new("paygate")
            .with_gateway(Arc::new(PayGateGateway::new(config.gateway.clone())) as BoxedPaymentGateway)
            .with_gateway(Arc::new(OzowGateway::new(config.gateway.clone())) as BoxedPaymentGateway);

        let backend = BackendClient::new(config.gateway.backend_base_url.clone());

        Self {
            gateways,
            backend,
            handoff: Arc::new(HandoffStore::new()),
            config,
        }
    }

    /// Get a specific payment gateway
    pub fn gateway(&self, name: &str) -> Option<&BoxedPaymentGateway> {
        self.gateways.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            gateway: GatewayConfig::new("http://localhost:4000", "http://localhost:3000"),
            test_product_id: None,
            environment: "test".to_string(),
        }
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = config();
        cfg.host = "0.0.0.0".to_string();
        cfg.port = 3000;
        assert_eq!(cfg.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_state_registers_both_gateways() {
        let state = AppState::with_config(config());
        assert!(state.gateway("paygate").is_some());
        assert!(state.gateway("ozow").is_some());
        assert!(state.gateways.get_or_default(None).is_some());
        assert!(state.gateway("paypal").is_none());
    }

    #[test]
    fn test_handoff_entries_are_consumed_on_take() {
        let store = HandoffStore::new();
        store.put(
            "INV-1001",
            HandoffEntry {
                amount: 597.0,
                customer: CustomerDetails {
                    name: "Thandi Nkosi".into(),
                    email: "thandi@example.co.za".into(),
                    ..Default::default()
                },
            },
        );

        assert!(store.contains("INV-1001"));
        let entry = store.take("INV-1001").unwrap();
        assert_eq!(entry.amount, 597.0);
        // Second read after consumption finds nothing
        assert!(store.take("INV-1001").is_none());
    }

    #[test]
    fn test_handoff_discard() {
        let store = HandoffStore::new();
        store.put(
            "INV-1002",
            HandoffEntry {
                amount: 100.0,
                customer: CustomerDetails::default(),
            },
        );
        store.discard("INV-1002");
        assert!(store.is_empty());
    }
}

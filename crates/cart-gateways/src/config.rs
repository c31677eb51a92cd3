//! # Gateway Configuration
//!
//! Base URLs for the payment-initiation service and the storefront
//! backend, resolved once at startup from the environment and passed
//! down explicitly. Call sites never re-derive hosts ad hoc.

use cart_core::{CheckoutError, CheckoutResult};
use std::env;

/// Where the gateway-initiation and storefront backends live
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the payment-initiation service
    /// (serves `/paygate/create` and `/ozow/initiate`)
    pub gateway_base_url: String,

    /// Base URL of the storefront backend
    /// (serves `/products` and `/invoices`)
    pub backend_base_url: String,
}

fn strip_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// - `GATEWAY_API_URL` (default `http://localhost:4000`)
    /// - `STOREFRONT_API_URL` (default `http://localhost:3000`)
    pub fn from_env() -> CheckoutResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let gateway_base_url = env::var("GATEWAY_API_URL")
            .unwrap_or_else(|_| "http://localhost:4000".to_string());
        let backend_base_url = env::var("STOREFRONT_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let config = Self::new(gateway_base_url, backend_base_url);
        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit values (tests, embedding)
    pub fn new(gateway_base_url: impl Into<String>, backend_base_url: impl Into<String>) -> Self {
        Self {
            gateway_base_url: strip_trailing_slash(&gateway_base_url.into()),
            backend_base_url: strip_trailing_slash(&backend_base_url.into()),
        }
    }

    fn validate(&self) -> CheckoutResult<()> {
        for (name, url) in [
            ("GATEWAY_API_URL", &self.gateway_base_url),
            ("STOREFRONT_API_URL", &self.backend_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CheckoutError::Configuration(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }
        Ok(())
    }

    /// Join a path onto the gateway base URL
    pub fn gateway_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.gateway_base_url, path)
    }

    /// Join a path onto the backend base URL
    pub fn backend_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_base_url, path)
    }
}

//! # Storefront Backend Client
//!
//! Consumes the products and invoices REST API. The backend predates
//! this service and is inconsistent about list envelopes: both a bare
//! array and `{"items": [...]}` must be accepted.

use crate::client::{http_client, parse_json, read_body};
use cart_core::{CheckoutError, CheckoutResult, Invoice, InvoicePayload, InvoiceStatus, Product};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, instrument};

/// Client for the storefront backend's products/invoices API
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

/// Lists arrive either bare or wrapped in an `items` envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListShape<T> {
    Bare(Vec<T>),
    Wrapped { items: Vec<T> },
}

impl<T> ListShape<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListShape::Bare(items) => items,
            ListShape::Wrapped { items } => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateInvoiceResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    invoice: Option<Invoice>,
    #[serde(default)]
    error: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_list<T: serde::de::DeserializeOwned>(&self, path: &str) -> CheckoutResult<Vec<T>> {
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        let (status, body) = read_body(response).await?;
        if !status.is_success() {
            error!("Backend GET {} failed: status={}", path, status);
            return Err(CheckoutError::Gateway {
                gateway: "backend".to_string(),
                message: format!("HTTP {}: {}", status, crate::client::body_snippet(&body)),
            });
        }

        let list: ListShape<T> = parse_json("backend", &body)?;
        Ok(list.into_vec())
    }

    /// Fetch the product catalog
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> CheckoutResult<Vec<Product>> {
        let products = self.get_list("/products").await?;
        debug!("Products fetched: {} items", products.len());
        Ok(products)
    }

    /// Fetch all invoices
    #[instrument(skip(self))]
    pub async fn list_invoices(&self) -> CheckoutResult<Vec<Invoice>> {
        self.get_list("/invoices").await
    }

    /// Find an invoice by invoice number (or backend row id)
    #[instrument(skip(self))]
    pub async fn find_invoice(&self, reference: &str) -> CheckoutResult<Option<Invoice>> {
        let invoices = self.list_invoices().await?;
        Ok(invoices.into_iter().find(|inv| inv.matches_reference(reference)))
    }

    /// Submit an invoice; the backend assigns the authoritative
    /// `invoice_number`
    #[instrument(skip(self, payload), fields(total = payload.total))]
    pub async fn create_invoice(&self, payload: &InvoicePayload) -> CheckoutResult<Invoice> {
        let response = self
            .client
            .post(self.endpoint("/invoices"))
            .json(payload)
            .send()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        let (status, body) = read_body(response).await?;
        if !status.is_success() {
            error!("Invoice creation failed: status={}, body={}", status, body);
            // The backend reports failures as {"error": "..."} when it can
            if let Ok(parsed) = serde_json::from_str::<CreateInvoiceResponse>(&body) {
                if let Some(message) = parsed.error {
                    return Err(CheckoutError::Gateway {
                        gateway: "backend".to_string(),
                        message,
                    });
                }
            }
            return Err(CheckoutError::Gateway {
                gateway: "backend".to_string(),
                message: format!("HTTP {}: {}", status, crate::client::body_snippet(&body)),
            });
        }

        let parsed: CreateInvoiceResponse = parse_json("backend", &body)?;
        if !parsed.success {
            return Err(CheckoutError::Gateway {
                gateway: "backend".to_string(),
                message: parsed
                    .error
                    .unwrap_or_else(|| "Invoice creation rejected".to_string()),
            });
        }
        parsed.invoice.ok_or_else(|| CheckoutError::UnexpectedResponse {
            service: "backend".to_string(),
            snippet: crate::client::body_snippet(&body),
        })
    }

    /// Update an invoice's status (e.g. cancel an abandoned payment)
    #[instrument(skip(self))]
    pub async fn update_invoice_status(
        &self,
        id: i64,
        status: InvoiceStatus,
    ) -> CheckoutResult<Invoice> {
        let response = self
            .client
            .put(self.endpoint(&format!("/invoices/{}/status", id)))
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        let (status_code, body) = read_body(response).await?;
        if !status_code.is_success() {
            error!("Status update for invoice {} failed: status={}", id, status_code);
            return Err(CheckoutError::Gateway {
                gateway: "backend".to_string(),
                message: format!("HTTP {}: {}", status_code, crate::client::body_snippet(&body)),
            });
        }

        // The backend answers with either the envelope or the bare invoice
        if let Ok(parsed) = serde_json::from_str::<CreateInvoiceResponse>(&body) {
            if let Some(invoice) = parsed.invoice {
                return Ok(invoice);
            }
        }
        parse_json("backend", &body)
    }
}

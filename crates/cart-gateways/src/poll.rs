//! # Invoice Status Polling
//!
//! After the redirect, payment confirmation arrives on the backend via
//! the gateway's server-to-server notification. This side polls the
//! invoices API until the matching invoice reads `completed`.
//!
//! Polling is bounded: a payment that never completes stops after
//! `max_attempts` with a timeout error instead of polling for the
//! lifetime of the process.

use crate::backend::BackendClient;
use cart_core::{CheckoutError, CheckoutResult, Invoice, InvoiceStatus};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// How often and how long to poll for payment confirmation
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Delay between polls
    pub interval: Duration,
    /// Give up after this many polls
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollPolicy {
    /// 5 second interval, 60 attempts (5 minutes of polling)
    fn default() -> Self {
        Self::new(Duration::from_secs(5), 60)
    }
}

/// Poll the backend until the referenced invoice reads `completed`.
///
/// Individual poll failures are logged and polling continues; only
/// policy exhaustion ends the loop with `PollTimeout`. The first probe
/// fires immediately. On success the caller clears the cart and any
/// session handoff entry for the reference.
#[instrument(skip(backend, policy), fields(max_attempts = policy.max_attempts))]
pub async fn poll_invoice(
    backend: &BackendClient,
    reference: &str,
    policy: &PollPolicy,
) -> CheckoutResult<Invoice> {
    for attempt in 1..=policy.max_attempts {
        match backend.find_invoice(reference).await {
            Ok(Some(invoice)) => {
                debug!(
                    "Poll {}/{}: {} is {}",
                    attempt,
                    policy.max_attempts,
                    reference,
                    invoice.status.as_str()
                );
                if invoice.status == InvoiceStatus::Completed {
                    info!("Payment confirmed for {}", reference);
                    return Ok(invoice);
                }
            }
            Ok(None) => {
                debug!("Poll {}/{}: {} not visible yet", attempt, policy.max_attempts, reference);
            }
            Err(e) => {
                // Surfaced but not fatal; the next poll may succeed
                warn!("Poll {}/{} failed: {}", attempt, policy.max_attempts, e);
            }
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(CheckoutError::PollTimeout {
        reference: reference.to_string(),
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn invoice_json(status: &str) -> serde_json::Value {
        serde_json::json!([{
            "invoice_number": "INV-1001",
            "customer_name": "Thandi Nkosi",
            "customer_email": "thandi@example.co.za",
            "subtotal": 498.0,
            "shipping_cost": 99.0,
            "total": 597.0,
            "status": status
        }])
    }

    fn fast_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy::new(Duration::from_millis(10), max_attempts)
    }

    #[tokio::test]
    async fn test_poll_returns_on_completed() {
        let server = MockServer::start().await;
        // First poll sees pending, subsequent polls see completed
        Mock::given(method("GET"))
            .and(path("/invoices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(invoice_json("pending")))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/invoices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(invoice_json("completed")))
            .mount(&server)
            .await;

        let backend = BackendClient::new(server.uri());
        let invoice = poll_invoice(&backend, "INV-1001", &fast_policy(10))
            .await
            .unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Completed);
    }

    #[tokio::test]
    async fn test_poll_times_out_when_never_completed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invoices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(invoice_json("pending")))
            .mount(&server)
            .await;

        let backend = BackendClient::new(server.uri());
        let err = poll_invoice(&backend, "INV-1001", &fast_policy(3))
            .await
            .unwrap_err();
        match err {
            CheckoutError::PollTimeout { reference, attempts } => {
                assert_eq!(reference, "INV-1001");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected PollTimeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_poll_continues_past_backend_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/invoices"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/invoices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(invoice_json("completed")))
            .mount(&server)
            .await;

        let backend = BackendClient::new(server.uri());
        let invoice = poll_invoice(&backend, "INV-1001", &fast_policy(10))
            .await
            .unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Completed);
    }
}

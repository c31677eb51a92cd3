//! # Checkout Error Types
//!
//! Typed error handling for the relief-cart checkout engine.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all cart and checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Pre-flight validation failure (empty cart, missing customer fields).
    /// Raised before any network call is attempted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Payment gateway not registered
    #[error("Unknown payment gateway: {gateway}")]
    GatewayNotFound { gateway: String },

    /// Gateway or backend reported a failure in a well-formed response
    #[error("Gateway error [{gateway}]: {message}")]
    Gateway { gateway: String, message: String },

    /// Network/HTTP error talking to the gateway or backend
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The response body was not the JSON we expected (commonly an HTML
    /// error page from a misconfigured host or proxy)
    #[error("Unexpected response from {service}: {snippet}")]
    UnexpectedResponse { service: String, snippet: String },

    /// Invoice could not be found on the backend
    #[error("Invoice not found: {reference}")]
    InvoiceNotFound { reference: String },

    /// Status polling gave up before the payment completed
    #[error("Payment for {reference} not confirmed after {attempts} polls")]
    PollTimeout { reference: String, attempts: u32 },

    /// A checkout is already in flight for this flow
    #[error("A checkout is already being processed")]
    AlreadyProcessing,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CheckoutError {
    /// Returns true if this error is retryable by the user re-submitting
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::NetworkError(_)
                | CheckoutError::Gateway { .. }
                | CheckoutError::UnexpectedResponse { .. }
                | CheckoutError::PollTimeout { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Configuration(_) => 500,
            CheckoutError::Validation(_) => 400,
            CheckoutError::GatewayNotFound { .. } => 404,
            CheckoutError::Gateway { .. } => 502,
            CheckoutError::NetworkError(_) => 503,
            CheckoutError::UnexpectedResponse { .. } => 502,
            CheckoutError::InvoiceNotFound { .. } => 404,
            CheckoutError::PollTimeout { .. } => 504,
            CheckoutError::AlreadyProcessing => 409,
            CheckoutError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for cart and checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(CheckoutError::NetworkError("timeout".into()).is_retryable());
        assert!(CheckoutError::UnexpectedResponse {
            service: "paygate".into(),
            snippet: "<html>".into()
        }
        .is_retryable());
        assert!(!CheckoutError::Validation("empty cart".into()).is_retryable());
        assert!(!CheckoutError::AlreadyProcessing.is_retryable());
    }

    #[test]
    fn test_unexpected_response_display_names_the_service() {
        let err = CheckoutError::UnexpectedResponse {
            service: "paygate".into(),
            snippet: "<html>".into(),
        };
        assert_eq!(err.to_string(), "Unexpected response from paygate: <html>");
        // The service name is plain display data, not an error chain
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckoutError::Validation("test".into()).status_code(), 400);
        assert_eq!(
            CheckoutError::InvoiceNotFound {
                reference: "INV-1".into()
            }
            .status_code(),
            404
        );
        assert_eq!(
            CheckoutError::UnexpectedResponse {
                service: "ozow".into(),
                snippet: "<html>".into()
            }
            .status_code(),
            502
        );
        assert_eq!(CheckoutError::AlreadyProcessing.status_code(), 409);
        assert_eq!(
            CheckoutError::PollTimeout {
                reference: "INV-1".into(),
                attempts: 60
            }
            .status_code(),
            504
        );
    }
}

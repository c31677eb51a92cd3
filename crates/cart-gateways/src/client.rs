//! # HTTP Plumbing
//!
//! Shared request helpers for the gateway and backend clients.
//!
//! Responses are always read as text first and parsed as JSON second.
//! Misconfigured hosts and proxies return HTML error pages; those must
//! surface as a typed "unexpected response" error carrying a snippet of
//! the body, never as an uncaught parse failure.

use cart_core::{CheckoutError, CheckoutResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Request timeout for gateway and backend calls
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const SNIPPET_LEN: usize = 140;

/// Build the HTTP client used by all integrations
pub fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}

/// Trim a response body down to something loggable
pub fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= SNIPPET_LEN {
        trimmed.to_string()
    } else {
        let mut end = SNIPPET_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}

/// Read a response body, mapping transport failures to `NetworkError`
pub async fn read_body(response: reqwest::Response) -> CheckoutResult<(reqwest::StatusCode, String)> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;
    Ok((status, body))
}

/// Parse a body that was already read as text.
///
/// A body that is not valid JSON of the expected shape becomes
/// `UnexpectedResponse` with `service` naming the remote side.
pub fn parse_json<T: DeserializeOwned>(service: &str, body: &str) -> CheckoutResult<T> {
    serde_json::from_str(body).map_err(|_| CheckoutError::UnexpectedResponse {
        service: service.to_string(),
        snippet: body_snippet(body),
    })
}

/// Stringify a JSON field value the way a form would carry it
pub fn form_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        ok: bool,
    }

    #[test]
    fn test_parse_json_happy_path() {
        let probe: Probe = parse_json("paygate", r#"{"ok":true}"#).unwrap();
        assert!(probe.ok);
    }

    #[test]
    fn test_html_body_becomes_unexpected_response() {
        let err = parse_json::<Probe>("paygate", "<html><body>502 Bad Gateway</body></html>")
            .unwrap_err();
        match err {
            CheckoutError::UnexpectedResponse { service, snippet } => {
                assert_eq!(service, "paygate");
                assert!(snippet.starts_with("<html>"));
            }
            other => panic!("expected UnexpectedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_body_snippet_truncates() {
        let long = "x".repeat(500);
        let snippet = body_snippet(&long);
        assert!(snippet.len() < 150);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_form_value_stringification() {
        use serde_json::json;
        assert_eq!(form_value(&json!("abc")), "abc");
        assert_eq!(form_value(&json!(59.9)), "59.9");
        assert_eq!(form_value(&json!(null)), "");
        assert_eq!(form_value(&json!(true)), "true");
    }
}

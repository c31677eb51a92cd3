//! # Redirect Form Rendering
//!
//! The customer reaches the gateway by POSTing a hidden form. In the
//! original browser flow that form was assembled in the DOM and aimed
//! at a named popup window; a named window is a browser-only concept,
//! so here the form is rendered as a self-contained auto-submitting
//! HTML page served to the customer instead.

use cart_core::PaymentInitiation;

/// Escape a value for interpolation into HTML text or attributes
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn hidden_input(name: &str, value: &str) -> String {
    format!(
        "    <input type=\"hidden\" name=\"{}\" value=\"{}\" />\n",
        escape_html(name),
        escape_html(value)
    )
}

/// Render the auto-submitting redirect form for a payment initiation.
///
/// Fields appear in the order the backend signed them, followed by
/// `SIGNATURE` and `SIGNATURE_METHOD` when set. The two are
/// independent: a gateway that names a signature method always gets
/// the `SIGNATURE_METHOD` field, even if the signature itself is
/// missing. A noscript fallback keeps the handoff usable without
/// JavaScript.
pub fn render_redirect_form(initiation: &PaymentInitiation) -> String {
    let mut fields = String::new();
    for (name, value) in &initiation.fields {
        fields.push_str(&hidden_input(name, value));
    }
    if let Some(signature) = &initiation.signature {
        fields.push_str(&hidden_input("SIGNATURE", signature));
    }
    if let Some(method) = &initiation.signature_method {
        fields.push_str(&hidden_input("SIGNATURE_METHOD", method));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Redirecting to secure payment...</title>
</head>
<body>
  <p>Redirecting you to the secure payment page for order {order}...</p>
  <form id="gateway-redirect" action="{action}" method="post">
{fields}    <noscript>
      <button type="submit">Continue to payment</button>
    </noscript>
  </form>
  <script>document.getElementById('gateway-redirect').submit();</script>
</body>
</html>
"#,
        order = escape_html(&initiation.order_id),
        action = escape_html(&initiation.endpoint),
        fields = fields,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initiation() -> PaymentInitiation {
        PaymentInitiation {
            order_id: "ORDER_1735816342123_a1b2c3d4e".into(),
            amount_rands: 597.0,
            endpoint: "https://secure.paygate.co.za/paypage".into(),
            fields: vec![
                ("PAYGATE_ID".into(), "10011072130".into()),
                ("AMOUNT".into(), "59700".into()),
            ],
            signature: Some("deadbeef".into()),
            signature_method: Some("HMAC-SHA256".into()),
        }
    }

    #[test]
    fn test_form_posts_to_gateway_endpoint() {
        let html = render_redirect_form(&initiation());
        assert!(html.contains(r#"action="https://secure.paygate.co.za/paypage" method="post""#));
        assert!(html.contains(r#"name="PAYGATE_ID" value="10011072130""#));
        assert!(html.contains(r#"name="SIGNATURE" value="deadbeef""#));
        assert!(html.contains(r#"name="SIGNATURE_METHOD" value="HMAC-SHA256""#));
        assert!(html.contains("document.getElementById('gateway-redirect').submit()"));
    }

    #[test]
    fn test_no_signature_fields_without_signature() {
        let mut init = initiation();
        init.signature = None;
        init.signature_method = None;
        let html = render_redirect_form(&init);
        assert!(!html.contains("SIGNATURE"));
    }

    #[test]
    fn test_signature_method_appended_even_without_signature() {
        let mut init = initiation();
        init.signature = None;
        let html = render_redirect_form(&init);
        assert!(html.contains(r#"name="SIGNATURE_METHOD" value="HMAC-SHA256""#));
        assert!(!html.contains(r#"name="SIGNATURE" "#));
    }

    #[test]
    fn test_field_values_are_escaped() {
        let mut init = initiation();
        init.fields
            .push(("NOTE".into(), r#""><script>alert(1)</script>"#.into()));
        let html = render_redirect_form(&init);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("<b>"), "&lt;b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }
}

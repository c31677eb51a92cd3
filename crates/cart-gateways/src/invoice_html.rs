//! # Printable Invoice Rendering
//!
//! Pure templating of an invoice into a self-contained HTML document
//! (inline styles, no external assets) suitable for download or print
//! without another backend round-trip.

use crate::form::escape_html;
use cart_core::{format_zar, Invoice};
use chrono::Utc;

/// Render an invoice as a standalone printable HTML document
pub fn render_invoice_html(invoice: &Invoice) -> String {
    let date = invoice
        .created_at
        .clone()
        .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());

    let mut rows = String::new();
    for line in &invoice.items {
        rows.push_str(&format!(
            "            <tr>\n                <td>{}</td>\n                <td>{}</td>\n                <td>{}</td>\n                <td>{}</td>\n            </tr>\n",
            escape_html(&line.name),
            line.quantity,
            format_zar(line.price),
            format_zar(line.total),
        ));
    }

    let status = {
        let s = invoice.status.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    };

    let address = escape_html(&invoice.customer_address).replace('\n', "<br>");

    let notes_block = if invoice.notes.trim().is_empty() {
        String::new()
    } else {
        format!(
            "    <div style=\"margin-top: 30px;\">\n        <h4>Notes:</h4>\n        <p>{}</p>\n    </div>\n",
            escape_html(&invoice.notes)
        )
    };

    let shipping_label = if invoice.shipping_method.is_empty() {
        "Standard"
    } else {
        &invoice.shipping_method
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Invoice {number}</title>
    <style>
        body {{ font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }}
        .header {{ text-align: center; border-bottom: 2px solid #dc2626; padding-bottom: 20px; margin-bottom: 30px; }}
        .company-name {{ color: #dc2626; font-size: 28px; font-weight: bold; }}
        .invoice-details {{ display: flex; justify-content: space-between; margin-bottom: 30px; }}
        .customer-info, .invoice-info {{ flex: 1; }}
        .invoice-info {{ text-align: right; }}
        table {{ width: 100%; border-collapse: collapse; margin-bottom: 20px; }}
        th, td {{ padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }}
        th {{ background-color: #f8f9fa; font-weight: bold; }}
        .totals {{ text-align: right; }}
        .total-row {{ font-weight: bold; font-size: 18px; }}
        .footer {{ margin-top: 40px; padding-top: 20px; border-top: 1px solid #ddd; text-align: center; color: #666; }}
    </style>
</head>
<body>
    <div class="header">
        <div class="company-name">RELIEF PHARMACY</div>
        <div>Pharmacy &amp; Wellness Essentials</div>
    </div>

    <div class="invoice-details">
        <div class="customer-info">
            <h3>Bill To:</h3>
            <strong>{customer_name}</strong><br>
            {customer_email}<br>
            {customer_phone}<br>
            {customer_address}
        </div>
        <div class="invoice-info">
            <h3>Invoice Details:</h3>
            <strong>Invoice #: {number}</strong><br>
            Date: {date}<br>
            Status: {status}<br>
            Shipping: {shipping}
        </div>
    </div>

    <table>
        <thead>
            <tr>
                <th>Item</th>
                <th>Quantity</th>
                <th>Unit Price</th>
                <th>Total</th>
            </tr>
        </thead>
        <tbody>
{rows}        </tbody>
    </table>

    <div class="totals">
        <div>Subtotal: {subtotal}</div>
        <div>Shipping: {shipping_cost}</div>
        <div class="total-row">Total: {total}</div>
    </div>

{notes}    <div class="footer">
        <p>Thank you for your business!</p>
        <p>Contact us: orders@reliefpharmacy.co.za | +27 (0)21 555 0199</p>
        <p>This is a computer-generated invoice.</p>
    </div>
</body>
</html>
"#,
        number = escape_html(&invoice.invoice_number),
        date = escape_html(&date),
        status = escape_html(&status),
        shipping = escape_html(shipping_label),
        customer_name = escape_html(&invoice.customer_name),
        customer_email = escape_html(&invoice.customer_email),
        customer_phone = escape_html(&invoice.customer_phone),
        customer_address = address,
        rows = rows,
        subtotal = format_zar(invoice.subtotal),
        shipping_cost = format_zar(invoice.shipping_cost),
        total = format_zar(invoice.total),
        notes = notes_block,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::{InvoiceLine, InvoiceStatus};

    fn invoice() -> Invoice {
        Invoice {
            id: Some(7),
            invoice_number: "INV-1001".into(),
            customer_name: "Thandi Nkosi".into(),
            customer_email: "thandi@example.co.za".into(),
            customer_phone: "+27 82 555 0101".into(),
            customer_address: "12 Long Street\nCape Town".into(),
            items: vec![InvoiceLine {
                name: "Heat Rub 50ml".into(),
                quantity: 2,
                price: 249.0,
                total: 498.0,
            }],
            subtotal: 498.0,
            shipping_cost: 99.0,
            total: 597.0,
            status: InvoiceStatus::Pending,
            shipping_method: "Standard Delivery".into(),
            notes: String::new(),
            created_at: Some("2026-08-30".into()),
        }
    }

    #[test]
    fn test_renders_invoice_fields() {
        let html = render_invoice_html(&invoice());
        assert!(html.contains("Invoice #: INV-1001"));
        assert!(html.contains("Heat Rub 50ml"));
        assert!(html.contains("Subtotal: R 498.00"));
        assert!(html.contains("Total: R 597.00"));
        assert!(html.contains("Status: Pending"));
        assert!(html.contains("Shipping: Standard Delivery"));
        // Self-contained: no external assets
        assert!(!html.contains("href="));
        assert!(!html.contains("src="));
    }

    #[test]
    fn test_multiline_address_becomes_line_breaks() {
        let html = render_invoice_html(&invoice());
        assert!(html.contains("12 Long Street<br>Cape Town"));
    }

    #[test]
    fn test_notes_only_rendered_when_present() {
        let without = render_invoice_html(&invoice());
        assert!(!without.contains("<h4>Notes:</h4>"));

        let mut with_notes = invoice();
        with_notes.notes = "Leave at reception".into();
        let html = render_invoice_html(&with_notes);
        assert!(html.contains("<h4>Notes:</h4>"));
        assert!(html.contains("Leave at reception"));
    }

    #[test]
    fn test_customer_input_is_escaped() {
        let mut hostile = invoice();
        hostile.customer_name = "<script>alert(1)</script>".into();
        let html = render_invoice_html(&hostile);
        assert!(!html.contains("<script>alert(1)</script>"));
    }
}

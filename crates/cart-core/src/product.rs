//! # Catalog Products
//!
//! Product shape as served by the storefront backend's products API.
//! The catalog itself lives behind that API; these types only describe
//! what the cart consumes.

use serde::{Deserialize, Serialize};

/// A product from the storefront catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Unit price in rands
    pub price: f64,

    /// Stock on hand, when the backend reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,

    /// Category label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Product image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Create a product with just the fields the cart needs
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            stock_quantity: None,
            category: None,
            image_url: None,
        }
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_product() {
        let json = r#"{"id":"cr-001","name":"Heat Rub 50ml","price":249.0}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "cr-001");
        assert_eq!(product.price, 249.0);
        assert!(product.image_url.is_none());
    }

    #[test]
    fn test_builder() {
        let product = Product::new("cr-002", "Relief Gel", 199.0).with_image("/img/gel.jpg");
        assert_eq!(product.image_url.as_deref(), Some("/img/gel.jpg"));
    }
}

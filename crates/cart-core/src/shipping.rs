//! # Shipping Methods
//!
//! Fixed catalog of delivery options with flat prices and the
//! free-shipping eligibility rule.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Orders at or above this subtotal qualify for free delivery
pub const FREE_SHIPPING_THRESHOLD: f64 = 500.0;

/// Flat fee charged when shipping is computed for an unknown method,
/// or for `Free` below the eligibility threshold
pub const FALLBACK_SHIPPING_FEE: f64 = 100.0;

/// Identifier for one of the fixed shipping methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethodId {
    Standard,
    Express,
    Collection,
    Free,
}

impl ShippingMethodId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingMethodId::Standard => "standard",
            ShippingMethodId::Express => "express",
            ShippingMethodId::Collection => "collection",
            ShippingMethodId::Free => "free",
        }
    }
}

impl Default for ShippingMethodId {
    fn default() -> Self {
        ShippingMethodId::Standard
    }
}

impl fmt::Display for ShippingMethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ShippingMethodId {
    type Err = UnknownShippingMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ShippingMethodId::Standard),
            "express" => Ok(ShippingMethodId::Express),
            "collection" => Ok(ShippingMethodId::Collection),
            "free" => Ok(ShippingMethodId::Free),
            other => Err(UnknownShippingMethod(other.to_string())),
        }
    }
}

/// Error for an unrecognized shipping method id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownShippingMethod(pub String);

impl fmt::Display for UnknownShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown shipping method: {}", self.0)
    }
}

impl std::error::Error for UnknownShippingMethod {}

/// One delivery option from the fixed catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    pub name: &'static str,
    pub description: &'static str,
    /// Flat price in rands
    pub price: f64,
    pub estimated_days: &'static str,
    pub tracking_available: bool,
}

/// The full shipping catalog. Static configuration, not persisted.
pub fn shipping_methods() -> &'static [ShippingMethod] {
    const METHODS: &[ShippingMethod] = &[
        ShippingMethod {
            id: ShippingMethodId::Standard,
            name: "Standard Delivery",
            description: "Standard courier delivery to your door",
            price: 99.00,
            estimated_days: "3-5 business days",
            tracking_available: true,
        },
        ShippingMethod {
            id: ShippingMethodId::Express,
            name: "Express Delivery",
            description: "Next business day delivery",
            price: 199.00,
            estimated_days: "1-2 business days",
            tracking_available: true,
        },
        ShippingMethod {
            id: ShippingMethodId::Collection,
            name: "Collection Point",
            description: "Collect from nearest pickup point",
            price: 59.00,
            estimated_days: "2-3 business days",
            tracking_available: true,
        },
        ShippingMethod {
            id: ShippingMethodId::Free,
            name: "Free Delivery",
            description: "Free delivery on orders over R500",
            price: 0.00,
            estimated_days: "5-7 business days",
            tracking_available: false,
        },
    ];
    METHODS
}

/// Look up a method in the catalog
pub fn shipping_method(id: ShippingMethodId) -> &'static ShippingMethod {
    shipping_methods()
        .iter()
        .find(|m| m.id == id)
        .unwrap_or(&shipping_methods()[0])
}

/// Display name for a method id (used as the invoice shipping label)
pub fn shipping_method_name(id: ShippingMethodId) -> &'static str {
    shipping_method(id).name
}

/// Compute the shipping cost for a cart subtotal and selected method.
///
/// `Free` costs zero only when the subtotal meets
/// [`FREE_SHIPPING_THRESHOLD`] (inclusive). Callers are expected to
/// keep `Free` unselectable below the threshold; if called
/// out-of-contract anyway, the fallback flat fee is charged instead of
/// silently granting free delivery.
pub fn calculate_shipping(subtotal: f64, method: ShippingMethodId) -> f64 {
    let shipping = shipping_method(method);

    if method == ShippingMethodId::Free {
        if subtotal >= FREE_SHIPPING_THRESHOLD {
            return 0.0;
        }
        return FALLBACK_SHIPPING_FEE;
    }

    shipping.price
}

/// Shipping cost for a method id supplied as a raw string (API edge).
/// Unknown ids charge the fallback flat fee.
pub fn calculate_shipping_for(subtotal: f64, method: &str) -> f64 {
    match method.parse::<ShippingMethodId>() {
        Ok(id) => calculate_shipping(subtotal, id),
        Err(_) => FALLBACK_SHIPPING_FEE,
    }
}

/// Methods selectable for the given subtotal.
/// `Free` is excluded below the eligibility threshold.
pub fn available_methods(subtotal: f64) -> Vec<&'static ShippingMethod> {
    shipping_methods()
        .iter()
        .filter(|m| m.id != ShippingMethodId::Free || subtotal >= FREE_SHIPPING_THRESHOLD)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_prices() {
        assert_eq!(calculate_shipping(200.0, ShippingMethodId::Standard), 99.0);
        assert_eq!(calculate_shipping(200.0, ShippingMethodId::Express), 199.0);
        assert_eq!(calculate_shipping(200.0, ShippingMethodId::Collection), 59.0);
    }

    #[test]
    fn test_free_shipping_threshold_is_inclusive() {
        assert_ne!(calculate_shipping(499.0, ShippingMethodId::Free), 0.0);
        assert_eq!(calculate_shipping(500.0, ShippingMethodId::Free), 0.0);
        assert_eq!(calculate_shipping(750.0, ShippingMethodId::Free), 0.0);
    }

    #[test]
    fn test_free_below_threshold_charges_fallback() {
        assert_eq!(
            calculate_shipping(499.99, ShippingMethodId::Free),
            FALLBACK_SHIPPING_FEE
        );
    }

    #[test]
    fn test_unknown_method_charges_fallback() {
        assert_eq!(calculate_shipping_for(200.0, "drone"), FALLBACK_SHIPPING_FEE);
        assert_eq!(calculate_shipping_for(200.0, "standard"), 99.0);
    }

    #[test]
    fn test_available_methods_excludes_free_below_threshold() {
        let below: Vec<_> = available_methods(200.0).iter().map(|m| m.id).collect();
        assert!(!below.contains(&ShippingMethodId::Free));
        assert_eq!(below.len(), 3);

        let at: Vec<_> = available_methods(500.0).iter().map(|m| m.id).collect();
        assert!(at.contains(&ShippingMethodId::Free));
        assert_eq!(at.len(), 4);
    }

    #[test]
    fn test_method_id_round_trip() {
        for m in shipping_methods() {
            assert_eq!(m.id.as_str().parse::<ShippingMethodId>().unwrap(), m.id);
        }
        assert!("overnight".parse::<ShippingMethodId>().is_err());
    }

    #[test]
    fn test_shipping_method_names() {
        assert_eq!(
            shipping_method_name(ShippingMethodId::Standard),
            "Standard Delivery"
        );
        assert_eq!(
            shipping_method_name(ShippingMethodId::Collection),
            "Collection Point"
        );
    }
}

//! # Cart Store
//!
//! Single-owner cart state with a pure reducer. Every action produces a
//! new state with `subtotal`, `shipping_cost` and `grand_total`
//! recomputed; derived totals are never mutated independently.

use crate::currency::round_to_cents;
use crate::product::Product;
use crate::shipping::{calculate_shipping, shipping_method, ShippingMethodId};
use serde::{Deserialize, Serialize};

/// A line item in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier, unique within the cart
    pub id: String,

    /// Product name (denormalized for display)
    pub name: String,

    /// Unit price in rands
    pub unit_price: f64,

    /// Quantity, always >= 1
    pub quantity: u32,

    /// Product image URL, empty when none
    #[serde(default)]
    pub image_url: String,
}

impl CartItem {
    /// Create a line item from a catalog product with quantity 1
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }

    /// Line total (unit price x quantity), rounded to cents
    pub fn total(&self) -> f64 {
        round_to_cents(self.unit_price * self.quantity as f64)
    }
}

/// The full cart state. Totals are derived, recomputed on every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    /// Line items in insertion order
    pub items: Vec<CartItem>,

    /// Currently selected shipping method
    pub selected_shipping: ShippingMethodId,

    /// Sum of line totals
    pub subtotal: f64,

    /// Shipping cost for the selected method (0 for test carts)
    pub shipping_cost: f64,

    /// `subtotal + shipping_cost`
    pub grand_total: f64,
}

impl CartState {
    /// The empty cart. Shipping defaults to standard with its flat
    /// price pre-loaded into `shipping_cost` while `grand_total` stays
    /// zero. Inherited contract; see `Clear` below.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected_shipping: ShippingMethodId::Standard,
            subtotal: 0.0,
            shipping_cost: shipping_method(ShippingMethodId::Standard).price,
            grand_total: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

/// The five cart transitions
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Add a product. An existing id increments its quantity by 1;
    /// otherwise the item is appended with quantity 1. The quantity on
    /// the incoming item is ignored.
    AddItem(CartItem),
    /// Remove the line entirely, regardless of quantity
    RemoveItem(String),
    /// Set a line's quantity directly, clamped to >= 1.
    /// Removal is only ever explicit via `RemoveItem`.
    UpdateQuantity { id: String, quantity: u32 },
    /// Select a shipping method
    SetShipping(ShippingMethodId),
    /// Reset to the empty cart (standard shipping, grand total 0)
    Clear,
}

fn has_test_product(items: &[CartItem], test_product_id: Option<&str>) -> bool {
    match test_product_id {
        Some(id) if !id.is_empty() => items.iter().any(|i| i.id == id),
        _ => items.iter().any(|i| {
            i.id.to_lowercase().contains("test") || i.name.to_lowercase().contains("test")
        }),
    }
}

fn recompute(
    items: Vec<CartItem>,
    selected_shipping: ShippingMethodId,
    test_product_id: Option<&str>,
) -> CartState {
    let subtotal = round_to_cents(items.iter().map(CartItem::total).sum());
    let shipping_cost = if has_test_product(&items, test_product_id) {
        0.0
    } else {
        calculate_shipping(subtotal, selected_shipping)
    };
    CartState {
        items,
        selected_shipping,
        subtotal,
        shipping_cost,
        grand_total: round_to_cents(subtotal + shipping_cost),
    }
}

/// Pure cart reducer: old state + action -> new state.
///
/// `test_product_id` is the externally configured "test" product; a
/// cart containing it ships for free regardless of method.
pub fn reduce(state: &CartState, action: CartAction, test_product_id: Option<&str>) -> CartState {
    match action {
        CartAction::AddItem(item) => {
            let mut items = state.items.clone();
            if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
                existing.quantity += 1;
            } else {
                items.push(CartItem {
                    quantity: 1,
                    ..item
                });
            }
            recompute(items, state.selected_shipping, test_product_id)
        }
        CartAction::RemoveItem(id) => {
            let items: Vec<_> = state.items.iter().filter(|i| i.id != id).cloned().collect();
            recompute(items, state.selected_shipping, test_product_id)
        }
        CartAction::UpdateQuantity { id, quantity } => {
            let quantity = quantity.max(1);
            let items: Vec<_> = state
                .items
                .iter()
                .map(|i| {
                    if i.id == id {
                        CartItem {
                            quantity,
                            ..i.clone()
                        }
                    } else {
                        i.clone()
                    }
                })
                .collect();
            recompute(items, state.selected_shipping, test_product_id)
        }
        CartAction::SetShipping(method) => {
            recompute(state.items.clone(), method, test_product_id)
        }
        CartAction::Clear => CartState::new(),
    }
}

/// Cart store: owns one [`CartState`] for the lifetime of a session.
///
/// An explicit instance rather than a process-wide singleton; create
/// one per session and pass it where it is needed.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    state: CartState,
    test_product_id: Option<String>,
}

impl CartStore {
    pub fn new() -> Self {
        Self {
            state: CartState::new(),
            test_product_id: None,
        }
    }

    /// Builder: configure the designated test product id
    pub fn with_test_product_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.test_product_id = if id.trim().is_empty() {
            None
        } else {
            Some(id.trim().to_string())
        };
        self
    }

    /// Apply an action, replacing the state with the reduced one
    pub fn dispatch(&mut self, action: CartAction) {
        self.state = reduce(&self.state, action, self.test_product_id.as_deref());
    }

    pub fn add_item(&mut self, item: CartItem) {
        self.dispatch(CartAction::AddItem(item));
    }

    pub fn add_product(&mut self, product: &Product) {
        self.add_item(CartItem::from_product(product));
    }

    pub fn remove_item(&mut self, id: &str) {
        self.dispatch(CartAction::RemoveItem(id.to_string()));
    }

    pub fn update_quantity(&mut self, id: &str, quantity: u32) {
        self.dispatch(CartAction::UpdateQuantity {
            id: id.to_string(),
            quantity,
        });
    }

    pub fn set_shipping(&mut self, method: ShippingMethodId) {
        self.dispatch(CartAction::SetShipping(method));
    }

    pub fn clear(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn items(&self) -> &[CartItem] {
        &self.state.items
    }

    pub fn subtotal(&self) -> f64 {
        self.state.subtotal
    }

    pub fn shipping_cost(&self) -> f64 {
        self.state.shipping_cost
    }

    pub fn grand_total(&self) -> f64 {
        self.state.grand_total
    }

    pub fn selected_shipping(&self) -> ShippingMethodId {
        self.state.selected_shipping
    }

    /// Whether the cart currently contains the designated test product
    pub fn has_test_product(&self) -> bool {
        has_test_product(&self.state.items, self.test_product_id.as_deref())
    }
}

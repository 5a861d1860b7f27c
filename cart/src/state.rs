//! Cart view state.

use crate::checkout::CheckoutOrder;
use crate::error::CartError;
use crate::notify::ToastStack;
use crate::summary::{CartDisplay, compute_display};
use crate::types::{CartItem, CartSummary};
use storefront_core::ids::ProductId;

/// Everything the cart page and header render from.
///
/// `items` and `summary` only change when the server confirms them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartState {
    /// Lines as last loaded.
    pub items: Vec<CartItem>,
    /// Totals as last loaded, if the summary endpoint answered.
    pub summary: Option<CartSummary>,
    /// Projected display values.
    pub display: CartDisplay,
    /// Visible toasts.
    pub toasts: ToastStack,
    /// Product the user tried to add before signing in.
    pub pending_product: Option<ProductId>,
    /// Name shown for the current session.
    pub session_label: Option<String>,
    /// Last submitted order.
    pub checkout: Option<CheckoutOrder>,
    /// Fields that failed checkout validation.
    pub checkout_errors: Vec<String>,
    /// Most recent failure.
    pub last_error: Option<CartError>,
}

impl CartState {
    /// Empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Units of `product_id` in the cart, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| &item.product.id == product_id)
            .map_or(0, |item| item.quantity)
    }

    /// Replace items and summary and recompute the display.
    pub fn apply_loaded(&mut self, items: Vec<CartItem>, summary: Option<CartSummary>) {
        self.display = compute_display(&items, summary.as_ref());
        self.items = items;
        self.summary = summary;
    }

    /// Show an empty cart.
    pub fn reset_cart(&mut self) {
        self.apply_loaded(Vec::new(), None);
    }

    /// Code of the applied coupon, per the last summary.
    #[must_use]
    pub fn applied_coupon(&self) -> Option<&str> {
        self.summary
            .as_ref()
            .and_then(|summary| summary.applied_coupon.as_ref())
            .map(|coupon| coupon.code.as_str())
    }
}

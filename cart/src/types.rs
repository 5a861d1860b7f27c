//! Cart wire types.
//!
//! All of these mirror server state; the client never edits them locally.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_catalog::Product;

/// One cart line as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product on this line.
    pub product: Product,
    /// Units, at least one.
    pub quantity: u32,
}

impl CartItem {
    /// `price * quantity`, using the list price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// The coupon currently applied to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// Coupon code.
    pub code: String,
    /// Discount granted, when the server reports it alongside the code.
    #[serde(default)]
    pub discount_amount: Option<Decimal>,
}

/// Coupon-aware totals computed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    /// Sum of line totals before discount.
    pub cart_total: Decimal,
    /// Discount granted by the applied coupon.
    #[serde(default)]
    pub discount_amount: Decimal,
    /// Amount due.
    pub final_amount: Decimal,
    /// The applied coupon, if any.
    #[serde(default)]
    pub applied_coupon: Option<AppliedCoupon>,
}

/// `{success, message}` acknowledgement of a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiAck {
    /// Server message, if any.
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_accepts_string_and_numeric_amounts() {
        let summary: CartSummary = serde_json::from_value(json!({
            "cart_total": "1000.00",
            "discount_amount": 100,
            "final_amount": "900.00",
            "applied_coupon": { "code": "SAVE10", "discount_type": "percentage" }
        }))
        .unwrap();

        assert_eq!(summary.final_amount, Decimal::new(900, 0));
        assert_eq!(summary.applied_coupon.unwrap().code, "SAVE10");
    }

    #[test]
    fn test_line_total_uses_list_price() {
        let item: CartItem = serde_json::from_value(json!({
            "product": {
                "id": 1, "name": "Mug", "price": "12.50",
                "discounted_price": "10.00", "is_on_sale": true
            },
            "quantity": 3
        }))
        .unwrap();

        assert_eq!(item.line_total(), Decimal::new(3750, 2));
    }
}

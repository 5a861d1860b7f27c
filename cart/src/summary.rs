//! Cart summary projection.
//!
//! Pure: items and an optional server summary in, display numbers out.

use crate::types::{CartItem, CartSummary};
use rust_decimal::Decimal;

/// Where the displayed totals came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalsSource {
    /// The server's coupon-aware summary.
    Server,
    /// `Σ price × quantity` computed locally because no summary answered.
    #[default]
    ClientFallback,
}

/// Numbers shown in the cart view and the header badge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartDisplay {
    /// Total before discount.
    pub subtotal: Decimal,
    /// Discount.
    pub discount: Decimal,
    /// Amount due.
    pub total: Decimal,
    /// `Σ quantity`, for the badge.
    pub item_count: u32,
    /// Code of the applied coupon.
    pub applied_coupon: Option<String>,
    /// Whether the applied-coupon and remove-coupon controls are shown.
    pub coupon_controls_visible: bool,
    /// Origin of the totals.
    pub source: TotalsSource,
}

/// Merge `items` and `summary` into display values.
///
/// A summary is authoritative and shown verbatim. Without one, the subtotal
/// and total fall back to `Σ price × quantity` with no discount. The item
/// count always comes from the items.
#[must_use]
pub fn compute_display(items: &[CartItem], summary: Option<&CartSummary>) -> CartDisplay {
    let item_count = items.iter().map(|item| item.quantity).sum();

    match summary {
        Some(summary) => {
            let applied_coupon = summary
                .applied_coupon
                .as_ref()
                .map(|coupon| coupon.code.clone());
            CartDisplay {
                subtotal: summary.cart_total,
                discount: summary.discount_amount,
                total: summary.final_amount,
                item_count,
                coupon_controls_visible: applied_coupon.is_some(),
                applied_coupon,
                source: TotalsSource::Server,
            }
        },
        None => {
            let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();
            CartDisplay {
                subtotal,
                discount: Decimal::ZERO,
                total: subtotal,
                item_count,
                applied_coupon: None,
                coupon_controls_visible: false,
                source: TotalsSource::ClientFallback,
            }
        },
    }
}

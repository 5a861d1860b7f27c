//! Cart client contract.
//!
//! [`CartApi`] is one method per backend endpoint. [`CartMutation`] names a
//! user-level operation and [`perform`] maps it onto endpoint calls,
//! including the multi-request ones (whole-line removal and the two-step
//! quantity update). Those read the line's quantity from the server first;
//! the page's last load may be stale.

use crate::config::QuantityUpdate;
use crate::error::Result;
use crate::types::{ApiAck, AppliedCoupon, CartItem, CartSummary};
use std::future::Future;
use storefront_core::ids::ProductId;

/// Backend cart endpoints.
///
/// Every method takes the session's bearer token. Implementations map HTTP
/// 401 to [`crate::CartError::Unauthorized`] and a non-2xx status or
/// `success: false` to [`crate::CartError::Rejected`].
pub trait CartApi: Send + Sync + 'static {
    /// Current lines in server order. Unrecognized envelopes yield an empty list.
    fn get_items(&self, access_token: &str) -> impl Future<Output = Result<Vec<CartItem>>> + Send;

    /// Coupon-aware totals.
    fn summary(&self, access_token: &str) -> impl Future<Output = Result<CartSummary>> + Send;

    /// Add `quantity` units, creating the line if needed.
    fn add_item(
        &self,
        access_token: &str,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<ApiAck>> + Send;

    /// One more unit.
    fn increase_item(
        &self,
        access_token: &str,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<ApiAck>> + Send;

    /// One fewer unit; the line disappears at zero.
    fn decrease_item(
        &self,
        access_token: &str,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<ApiAck>> + Send;

    /// Set the line to exactly `quantity` in one request.
    ///
    /// Only called under [`QuantityUpdate::SetQuantity`].
    fn set_quantity(
        &self,
        access_token: &str,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<ApiAck>> + Send;

    /// Remove every line.
    fn clear_cart(&self, access_token: &str) -> impl Future<Output = Result<ApiAck>> + Send;

    /// Apply `code`; the server replaces any previous coupon.
    fn apply_coupon(
        &self,
        access_token: &str,
        code: &str,
    ) -> impl Future<Output = Result<AppliedCoupon>> + Send;

    /// Remove the coupon `code`.
    fn remove_coupon(
        &self,
        access_token: &str,
        code: &str,
    ) -> impl Future<Output = Result<ApiAck>> + Send;
}

/// A user-level cart change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartMutation {
    /// Add units.
    Add {
        /// Product.
        product_id: ProductId,
        /// Units to add.
        quantity: u32,
    },
    /// +1.
    Increase {
        /// Product.
        product_id: ProductId,
    },
    /// -1.
    Decrease {
        /// Product.
        product_id: ProductId,
    },
    /// Set the line to `quantity`.
    UpdateQuantity {
        /// Product.
        product_id: ProductId,
        /// Target units.
        quantity: u32,
    },
    /// Drop the whole line.
    Remove {
        /// Product.
        product_id: ProductId,
    },
    /// Empty the cart.
    Clear,
    /// Apply a coupon.
    ApplyCoupon {
        /// Code as typed.
        code: String,
    },
    /// Remove the applied coupon.
    RemoveCoupon {
        /// Code reported by the summary.
        code: String,
    },
}

impl CartMutation {
    /// Toast text on success.
    #[must_use]
    pub const fn success_message(&self) -> &'static str {
        match self {
            Self::Add { .. } => "Item added to cart",
            Self::Increase { .. } => "Quantity increased",
            Self::Decrease { .. } => "Quantity decreased",
            Self::UpdateQuantity { .. } => "Quantity updated",
            Self::Remove { .. } => "Item removed from cart",
            Self::Clear => "Cart cleared",
            Self::ApplyCoupon { .. } => "Coupon applied",
            Self::RemoveCoupon { .. } => "Coupon removed",
        }
    }

    /// Toast text on failure when the server gives no message.
    #[must_use]
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::Add { .. } => "Failed to add item to cart",
            Self::Increase { .. } => "Failed to increase quantity",
            Self::Decrease { .. } => "Failed to decrease quantity",
            Self::UpdateQuantity { .. } => "Failed to update quantity",
            Self::Remove { .. } => "Failed to remove item",
            Self::Clear => "Failed to clear cart",
            Self::ApplyCoupon { .. } => "Failed to apply coupon",
            Self::RemoveCoupon { .. } => "Failed to remove coupon",
        }
    }

    /// Whether the mutation may need more than one request.
    ///
    /// A failure part-way leaves the server cart changed, so the view is
    /// reloaded after a failure.
    #[must_use]
    pub const fn is_multi_step(&self, strategy: QuantityUpdate) -> bool {
        match self {
            Self::UpdateQuantity { .. } => matches!(strategy, QuantityUpdate::RemoveThenAdd),
            Self::Remove { .. } => true,
            _ => false,
        }
    }
}

/// Carry out `mutation` against `api`.
///
/// The backend only decrements, so a whole-line removal fetches the items,
/// then decrements once per unit the server reports. The two-step quantity
/// update does the same before adding the target quantity. A line the
/// server no longer has counts as removed. Stops at the first failing
/// request.
///
/// # Errors
///
/// Propagates the first failing request's error.
pub async fn perform<C: CartApi>(
    api: &C,
    access_token: &str,
    mutation: &CartMutation,
    strategy: QuantityUpdate,
) -> Result<ApiAck> {
    match mutation {
        CartMutation::Add {
            product_id,
            quantity,
        } => api.add_item(access_token, product_id, *quantity).await,
        CartMutation::Increase { product_id } => api.increase_item(access_token, product_id).await,
        CartMutation::Decrease { product_id } => api.decrease_item(access_token, product_id).await,
        CartMutation::UpdateQuantity {
            product_id,
            quantity,
        } => match strategy {
            QuantityUpdate::SetQuantity => {
                api.set_quantity(access_token, product_id, *quantity).await
            },
            QuantityUpdate::RemoveThenAdd => {
                let current = server_quantity(api, access_token, product_id).await?;
                remove_units(api, access_token, product_id, current).await?;
                api.add_item(access_token, product_id, *quantity).await
            },
        },
        CartMutation::Remove { product_id } => {
            let current = server_quantity(api, access_token, product_id).await?;
            if current == 0 {
                tracing::debug!(%product_id, "Line already gone on the server");
            }
            remove_units(api, access_token, product_id, current).await
        },
        CartMutation::Clear => api.clear_cart(access_token).await,
        CartMutation::ApplyCoupon { code } => {
            let applied = api.apply_coupon(access_token, code).await?;
            tracing::debug!(code = %applied.code, "Coupon accepted");
            Ok(ApiAck::default())
        },
        CartMutation::RemoveCoupon { code } => api.remove_coupon(access_token, code).await,
    }
}

/// Units of `product_id` the server holds right now.
async fn server_quantity<C: CartApi>(
    api: &C,
    access_token: &str,
    product_id: &ProductId,
) -> Result<u32> {
    let items = api.get_items(access_token).await?;
    Ok(items
        .iter()
        .filter(|item| &item.product.id == product_id)
        .map(|item| item.quantity)
        .sum())
}

async fn remove_units<C: CartApi>(
    api: &C,
    access_token: &str,
    product_id: &ProductId,
    units: u32,
) -> Result<ApiAck> {
    let mut ack = ApiAck::default();
    for step in 0..units {
        tracing::trace!(%product_id, step, units, "Decrementing line");
        ack = api.decrease_item(access_token, product_id).await?;
    }
    Ok(ack)
}

//! Cart actions.

use crate::api::CartMutation;
use crate::checkout::CheckoutDetails;
use crate::error::CartError;
use crate::notify::{Severity, ToastId};
use crate::types::{ApiAck, CartItem, CartSummary};
use storefront_auth::{AuthError, RedirectState, Session};
use storefront_core::ids::ProductId;

/// Everything that can happen to the cart page.
///
/// Commands come from the UI; events are fed back by effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    // Commands
    /// Fetch items and summary.
    LoadCart,
    /// Add units of a product.
    AddItem {
        /// Product.
        product_id: ProductId,
        /// Units, at least one.
        quantity: u32,
    },
    /// +1.
    IncreaseItem {
        /// Product.
        product_id: ProductId,
    },
    /// -1, removing the line at zero.
    DecreaseItem {
        /// Product.
        product_id: ProductId,
    },
    /// Set a line's quantity.
    UpdateQuantity {
        /// Product.
        product_id: ProductId,
        /// Target units, at least one.
        quantity: u32,
    },
    /// Remove a whole line, after confirmation.
    RemoveItem {
        /// Product.
        product_id: ProductId,
    },
    /// Empty the cart, after confirmation.
    ClearCart,
    /// Apply a coupon code.
    ApplyCoupon {
        /// Code as typed.
        code: String,
    },
    /// Remove the applied coupon.
    RemoveCoupon,
    /// Start a guest session from the login prompt.
    ContinueAsGuest,
    /// Leave for the identity provider.
    SignInWithProvider,
    /// The provider redirected back.
    OAuthCallback {
        /// Callback query string.
        query: String,
    },
    /// Drop the session.
    Logout,
    /// Close the login prompt without signing in.
    DismissLoginPrompt,
    /// Show a toast.
    Notify {
        /// Text.
        message: String,
        /// Severity.
        severity: Severity,
    },
    /// Hide a toast.
    DismissToast {
        /// Toast.
        id: ToastId,
    },
    /// Validate billing details and snapshot the order.
    SubmitCheckout {
        /// Billing details.
        details: CheckoutDetails,
    },

    // Events
    /// Items and summary arrived.
    CartLoaded {
        /// Lines.
        items: Vec<CartItem>,
        /// Totals; `None` when the summary endpoint failed.
        summary: Option<CartSummary>,
    },
    /// Loading items failed.
    CartLoadFailed {
        /// Cause.
        error: CartError,
    },
    /// The server confirmed a mutation.
    MutationSucceeded {
        /// What was done.
        mutation: CartMutation,
        /// Server acknowledgement.
        ack: ApiAck,
    },
    /// A mutation failed.
    MutationFailed {
        /// What was attempted.
        mutation: CartMutation,
        /// Cause.
        error: CartError,
    },
    /// A guest or OAuth session was saved.
    SignedIn {
        /// New session.
        session: Session,
        /// State restored from the redirect.
        redirect: RedirectState,
    },
    /// Sign-in failed.
    SignInFailed {
        /// Cause.
        error: AuthError,
    },
}

//! # Storefront Cart
//!
//! The cart page and header badge: server-confirmed lines and totals,
//! authentication-gated mutations, coupons, toasts and checkout.
//!
//! ## Flow
//!
//! Every UI event is a [`CartAction`]. [`CartReducer`] validates it, asks
//! the [`storefront_auth::AuthGate`] for a session, confirms destructive
//! operations and hands the request to a [`CartApi`] as an effect. The
//! server's answer comes back as an event; success reloads the cart so the
//! view never drifts from the server.
//!
//! ## Totals
//!
//! [`summary::compute_display`] is the single place display totals come
//! from: the server summary when it answered, line totals otherwise.
//!
//! ## Example
//!
//! ```rust,ignore
//! use storefront_cart::{CartAction, CartReducer, CartState};
//! use storefront_runtime::Store;
//!
//! let store = Store::new(CartState::new(), CartReducer::new(), env);
//! store.send(CartAction::LoadCart).await?;
//! store
//!     .send(CartAction::AddItem { product_id: "42".into(), quantity: 1 })
//!     .await?;
//! ```

pub mod actions;
pub mod api;
pub mod checkout;
pub mod config;
pub mod environment;
pub mod error;
pub mod http;
pub mod notify;
pub mod providers;
pub mod reducer;
pub mod state;
pub mod summary;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod mocks;

pub use actions::CartAction;
pub use api::{CartApi, CartMutation, perform};
pub use checkout::{CheckoutDetails, CheckoutOrder};
pub use config::{CartConfig, NotificationConfig, QuantityUpdate};
pub use environment::CartEnvironment;
pub use error::{CartError, Result};
pub use http::HttpCartApi;
pub use notify::{Severity, Toast, ToastId, ToastStack};
pub use providers::Confirmer;
pub use reducer::CartReducer;
pub use state::CartState;
pub use summary::{CartDisplay, TotalsSource, compute_display};
pub use types::{ApiAck, AppliedCoupon, CartItem, CartSummary};

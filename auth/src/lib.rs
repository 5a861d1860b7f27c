//! # Storefront Authentication
//!
//! Client-side identity for the storefront: who is acting, whether they may
//! mutate the cart, and how they sign in.
//!
//! ## Features
//!
//! - **Session store**: one persisted session per browser profile, mirrored into cookies
//! - **Auth gate**: every mutating cart operation asks it first
//! - **Guest sessions**: fabricated locally, 30-day expiry, no server round trip
//! - **OAuth sessions**: authorization-code redirect, pending product carried in `state`
//!
//! ## Architecture
//!
//! Browser surfaces (storage, cookies, the login modal, navigation) are
//! traits in [`providers`]. The code-for-token exchange is the only async
//! provider; [`http::HttpTokenExchange`] talks to the backend.
//!
//! ## Example: gating a cart mutation
//!
//! ```rust,ignore
//! use storefront_auth::{AuthGate, GateDecision};
//!
//! match gate.require_auth() {
//!     GateDecision::Authorized(session) => send_request(&session.access_token).await,
//!     GateDecision::Unauthorized => {
//!         // login prompt is already visible; nothing was sent
//!     }
//! }
//! ```

// Public modules
pub mod config;
pub mod constants;
pub mod error;
pub mod gate;
pub mod guest;
pub mod http;
pub mod oauth;
pub mod providers;
pub mod session;
pub mod state;
pub mod utils;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use config::{OAuthConfig, SessionConfig};
pub use error::{AuthError, Result};
pub use gate::{AuthGate, GateDecision};
pub use guest::create_guest_session;
pub use oauth::{OAuthCallback, OAuthRedirect, complete_oauth_login};
pub use session::{SessionStore, is_session_valid};
pub use state::{OAuthUser, RedirectState, Session, SessionKind, StoredAuth};

//! Provider traits for the browser surfaces authentication touches.
//!
//! Synchronous surfaces (storage, cookies, the login modal, navigation) are
//! object-safe and shared as `Arc<dyn _>`. The code-for-token exchange is a
//! network call and returns a `Send` future.

pub mod cookies;
pub mod navigator;
pub mod prompt;
pub mod storage;
pub mod token_exchange;

pub use cookies::{AuthCookie, CookieJar, SameSite};
pub use navigator::Navigator;
pub use prompt::LoginPrompt;
pub use storage::KeyValueStorage;
pub use token_exchange::{IssuedTokens, TokenExchange};

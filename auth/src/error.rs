//! Error types for session and sign-in operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for client-side authentication.
///
/// Errors travel through reducer actions, hence `Clone` and `PartialEq`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Session Errors
    // ═══════════════════════════════════════════════════════════

    /// No usable session at gate-check time.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Session exists but its expiry has passed.
    #[error("Session has expired")]
    SessionExpired,

    /// A session could not be encoded for storage.
    #[error("Malformed session: {0}")]
    MalformedSession(String),

    /// The backing storage refused the write.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    // ═══════════════════════════════════════════════════════════
    // OAuth Errors
    // ═══════════════════════════════════════════════════════════

    /// Callback query carried no authorization code.
    #[error("OAuth callback is missing the authorization code")]
    OAuthCodeMissing,

    /// Callback `state` could not be decoded.
    #[error("Invalid OAuth state parameter: {0}")]
    OAuthStateInvalid(String),

    /// The identity provider reported an error (e.g. consent denied).
    #[error("OAuth sign-in was denied: {0}")]
    OAuthDenied(String),

    /// The backend refused to exchange the code.
    #[error("Token exchange failed: {message}")]
    TokenExchangeFailed {
        /// HTTP status, when the backend answered
        status: Option<u16>,
        /// Backend or decoding message
        message: String,
    },

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// The request never got an answer.
    #[error("Network error: {0}")]
    Transport(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    /// Returns `true` when the user should simply be asked to sign in again.
    ///
    /// # Examples
    ///
    /// ```
    /// # use storefront_auth::AuthError;
    /// assert!(AuthError::SessionExpired.requires_login());
    /// assert!(!AuthError::Transport("reset".into()).requires_login());
    /// ```
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated
                | Self::SessionExpired
                | Self::OAuthDenied(_)
                | Self::OAuthCodeMissing
                | Self::OAuthStateInvalid(_)
        )
    }
}

//! Cart error types.

use storefront_auth::AuthError;
use thiserror::Error;

/// Result alias for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;

/// Errors raised by cart operations.
///
/// Every variant ends as a notification at the reducer boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No usable session at gate-check time; nothing was sent.
    #[error("Not signed in")]
    Unauthenticated,

    /// The backend rejected the session (HTTP 401).
    #[error("Session rejected by server")]
    Unauthorized,

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx answer or `success: false`.
    #[error("Request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Server-provided message.
        message: Option<String>,
    },

    /// The body could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Input rejected before any request was sent; lists the offending fields.
    #[error("Invalid input: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// The user declined a confirmation.
    #[error("Cancelled by user")]
    Cancelled,

    /// Sign-in failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl CartError {
    /// Message supplied by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    /// Whether the backend refused our credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

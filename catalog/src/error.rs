//! Catalog error types.

use thiserror::Error;

/// Result alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while reading the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status code.
        status: u16,
        /// Body or detail message.
        message: String,
    },

    /// The resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The body could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Input rejected before any request was sent; lists the offending fields.
    #[error("Invalid input: {}", .0.join(", "))]
    Validation(Vec<String>),
}

//! Authorization-code exchange trait.

use crate::error::Result;
use crate::state::OAuthUser;
use std::future::Future;

/// Tokens issued by the backend for an authorization code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTokens {
    /// Bearer token for cart requests.
    pub access_token: String,
    /// Refresh token, if issued.
    pub refresh_token: Option<String>,
    /// Signed-in user.
    pub user: OAuthUser,
    /// Seconds until the access token expires, if the backend says.
    pub expires_in: Option<i64>,
}

/// Exchanges an authorization code for tokens.
///
/// The identity provider's token endpoint is only reachable server-side,
/// so implementations talk to the storefront backend.
pub trait TokenExchange: Send + Sync {
    /// Exchange `code`, obtained for `redirect_uri`, for tokens.
    ///
    /// # Errors
    ///
    /// - [`crate::AuthError::Transport`] if the backend is unreachable
    /// - [`crate::AuthError::TokenExchangeFailed`] if it refuses the code
    fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> impl Future<Output = Result<IssuedTokens>> + Send;
}

//! OAuth sign-in.
//!
//! 1. [`OAuthRedirect::authorization_url`] builds the provider URL; the
//!    pending product and return URL ride along in `state` as JSON.
//! 2. The provider sends the browser back with `code` and `state`;
//!    [`OAuthCallback::parse`] reads them.
//! 3. [`complete_oauth_login`] exchanges the code and persists the session.

use crate::config::OAuthConfig;
use crate::constants::id_prefixes;
use crate::error::{AuthError, Result};
use crate::providers::TokenExchange;
use crate::session::SessionStore;
use crate::state::{RedirectState, Session, SessionKind};
use crate::utils::random_base36;
use chrono::Duration;
use serde::Deserialize;

/// Builds authorization URLs for the configured provider.
#[derive(Debug, Clone)]
pub struct OAuthRedirect {
    config: OAuthConfig,
}

impl OAuthRedirect {
    /// Create a redirect builder.
    #[must_use]
    pub const fn new(config: OAuthConfig) -> Self {
        Self { config }
    }

    /// OAuth configuration.
    #[must_use]
    pub const fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Authorization URL carrying `state`.
    ///
    /// Includes `client_id`, `redirect_uri`, `scope`, `response_type=code`,
    /// the URL-encoded JSON `state`, and `access_type=offline` /
    /// `prompt=consent` when enabled.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the query cannot be encoded.
    pub fn authorization_url(&self, state: &RedirectState) -> Result<String> {
        let state_json = serde_json::to_string(state)
            .map_err(|e| AuthError::OAuthStateInvalid(e.to_string()))?;
        let scope = self.config.scopes.join(" ");

        let mut params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("response_type", "code"),
            ("state", state_json.as_str()),
        ];
        if self.config.offline_access {
            params.push(("access_type", "offline"));
        }
        if self.config.force_consent {
            params.push(("prompt", "consent"));
        }

        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| AuthError::Configuration(format!("Failed to encode URL params: {e}")))?;

        Ok(format!("{}?{query}", self.config.authorization_endpoint))
    }
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Parameters the provider hands back on the callback URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCallback {
    /// Authorization code.
    pub code: String,
    /// Restored redirect state.
    pub state: RedirectState,
}

impl OAuthCallback {
    /// Parse the callback query string (with or without the leading `?`).
    ///
    /// A missing `state` restores to an empty return URL with no product.
    ///
    /// # Errors
    ///
    /// - [`AuthError::OAuthDenied`] if the provider reported an `error`
    /// - [`AuthError::OAuthCodeMissing`] if there is no `code`
    /// - [`AuthError::OAuthStateInvalid`] if `state` is not the expected JSON
    pub fn parse(query: &str) -> Result<Self> {
        let query = query.trim_start_matches('?');
        let parsed: CallbackQuery = serde_urlencoded::from_str(query)
            .map_err(|e| AuthError::OAuthStateInvalid(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(AuthError::OAuthDenied(error));
        }

        let code = parsed
            .code
            .filter(|code| !code.is_empty())
            .ok_or(AuthError::OAuthCodeMissing)?;

        let state = match parsed.state {
            Some(raw) if !raw.is_empty() => decode_state(&raw)?,
            _ => RedirectState::new(None, String::new()),
        };

        Ok(Self { code, state })
    }
}

/// Decode the JSON carried in `state`.
///
/// Query parsing already removed one layer of percent-encoding; a value that
/// was encoded twice on the way out is decoded once more.
///
/// # Errors
///
/// Returns [`AuthError::OAuthStateInvalid`] if neither form is valid JSON.
pub fn decode_state(raw: &str) -> Result<RedirectState> {
    if let Ok(state) = serde_json::from_str(raw) {
        return Ok(state);
    }

    let decoded =
        urlencoding::decode(raw).map_err(|e| AuthError::OAuthStateInvalid(e.to_string()))?;
    serde_json::from_str(&decoded).map_err(|e| AuthError::OAuthStateInvalid(e.to_string()))
}

/// Exchange the callback code and persist the resulting OAuth session.
///
/// The session lasts `expires_in` seconds when the backend reports it, and
/// the configured OAuth lifetime otherwise.
///
/// # Errors
///
/// Propagates exchange failures and storage failures.
pub async fn complete_oauth_login<X>(
    exchange: &X,
    sessions: &SessionStore,
    redirect_uri: &str,
    code: &str,
) -> Result<Session>
where
    X: TokenExchange,
{
    let tokens = exchange.exchange_code(code, redirect_uri).await?;
    let now = sessions.now();
    let reported = tokens
        .expires_in
        .filter(|secs| *secs > 0)
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl));
    if reported.is_none() && tokens.expires_in.is_some() {
        tracing::warn!(expires_in = ?tokens.expires_in, "Ignoring unusable token lifetime");
    }
    let expires_at = reported
        .or_else(|| now.checked_add_signed(sessions.config().oauth_session_ttl))
        .ok_or_else(|| AuthError::Configuration("OAuth session lifetime out of range".to_string()))?;

    let session = Session {
        kind: SessionKind::OAuth,
        session_id: format!(
            "{}_{}_{}",
            id_prefixes::OAUTH,
            now.timestamp_millis(),
            random_base36(9)
        ),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user: Some(tokens.user),
        created_at: now,
        expires_at,
    };

    sessions.save(&session)?;
    tracing::info!(session_id = %session.session_id, "OAuth sign-in completed");
    Ok(session)
}

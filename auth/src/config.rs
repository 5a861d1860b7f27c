//! Authentication configuration.
//!
//! Configuration values are provided by the embedding page, not hardcoded.

use crate::constants::{DEFAULT_COOKIE_PREFIX, DEFAULT_STORAGE_KEY, GOOGLE_AUTHORIZATION_ENDPOINT};
use crate::error::{AuthError, Result};
use chrono::Duration;

/// Session persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Storage key holding the serialized session.
    pub storage_key: String,

    /// Prefix of the three mirrored cookies (`<prefix>_session_id`, ...).
    pub cookie_prefix: String,

    /// Lifetime of a guest session.
    ///
    /// Default: 30 days
    pub guest_session_ttl: Duration,

    /// Lifetime of an OAuth session when the backend does not say otherwise.
    ///
    /// Default: 1 hour
    pub oauth_session_ttl: Duration,
}

impl SessionConfig {
    /// Create a session configuration with default lifetimes.
    #[must_use]
    pub fn new(storage_key: impl Into<String>, cookie_prefix: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
            cookie_prefix: cookie_prefix.into(),
            guest_session_ttl: Duration::days(30),
            oauth_session_ttl: Duration::hours(1),
        }
    }

    /// Set guest session lifetime.
    #[must_use]
    pub const fn with_guest_ttl(mut self, ttl: Duration) -> Self {
        self.guest_session_ttl = ttl;
        self
    }

    /// Set default OAuth session lifetime.
    #[must_use]
    pub const fn with_oauth_ttl(mut self, ttl: Duration) -> Self {
        self.oauth_session_ttl = ttl;
        self
    }

    /// Full cookie name for a suffix from [`crate::constants::cookie_names`].
    #[must_use]
    pub fn cookie_name(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.cookie_prefix)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY, DEFAULT_COOKIE_PREFIX)
    }
}

/// OAuth redirect configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    /// Client ID registered with the identity provider.
    pub client_id: String,

    /// Callback URL on the storefront (e.g. `https://shop.example/accounts/google/login/callback/`).
    pub redirect_uri: String,

    /// Provider authorization endpoint.
    ///
    /// Default: Google
    pub authorization_endpoint: String,

    /// Requested scopes.
    ///
    /// Default: `profile`, `email`
    pub scopes: Vec<String>,

    /// Ask for a refresh token (`access_type=offline`).
    pub offline_access: bool,

    /// Always show the consent screen (`prompt=consent`).
    pub force_consent: bool,
}

impl OAuthConfig {
    /// Create an OAuth configuration for Google.
    #[must_use]
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            authorization_endpoint: GOOGLE_AUTHORIZATION_ENDPOINT.to_string(),
            scopes: vec!["profile".to_string(), "email".to_string()],
            offline_access: true,
            force_consent: true,
        }
    }

    /// Load from `STOREFRONT_OAUTH_CLIENT_ID` and `STOREFRONT_OAUTH_REDIRECT_URI`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if either variable is missing or empty.
    pub fn from_env() -> Result<Self> {
        let client_id = required_env("STOREFRONT_OAUTH_CLIENT_ID")?;
        let redirect_uri = required_env("STOREFRONT_OAUTH_REDIRECT_URI")?;
        Ok(Self::new(client_id, redirect_uri))
    }

    /// Set the authorization endpoint.
    #[must_use]
    pub fn with_authorization_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.authorization_endpoint = endpoint.into();
        self
    }

    /// Replace the requested scopes.
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Toggle `access_type=offline`.
    #[must_use]
    pub const fn with_offline_access(mut self, enabled: bool) -> Self {
        self.offline_access = enabled;
        self
    }

    /// Toggle `prompt=consent`.
    #[must_use]
    pub const fn with_force_consent(mut self, enabled: bool) -> Self {
        self.force_consent = enabled;
        self
    }
}

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AuthError::Configuration(format!("{name} is not set"))),
    }
}

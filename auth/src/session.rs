//! Session/token store.
//!
//! One persisted session per browser profile, stored as JSON
//! `{userType, data, timestamp}` under a single key and mirrored into
//! three cookies for server-side reads. Nothing here ever fails on bad
//! stored data: malformed values are treated as absent and removed.

use crate::config::SessionConfig;
use crate::constants::cookie_names;
use crate::error::{AuthError, Result};
use crate::providers::{AuthCookie, CookieJar, KeyValueStorage};
use crate::state::{Session, StoredAuth};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use storefront_core::environment::Clock;

/// Whether `session` is usable at `now`.
///
/// True iff the session id and access token are non-empty and `expires_at`
/// is strictly after `now`.
#[must_use]
pub fn is_session_valid(session: &Session, now: DateTime<Utc>) -> bool {
    has_identity(session) && !session.is_expired(now)
}

fn has_identity(session: &Session) -> bool {
    !session.session_id.trim().is_empty() && !session.access_token.trim().is_empty()
}

/// Persists and validates the current session.
///
/// Cheap to clone; clones share the same storage, cookie jar and clock.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    cookies: Arc<dyn CookieJar>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
}

impl SessionStore {
    /// Create a session store.
    #[must_use]
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        cookies: Arc<dyn CookieJar>,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Self {
        Self {
            storage,
            cookies,
            clock,
            config,
        }
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current time according to the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Persist `session`, overwriting any previous one, and mirror it into cookies.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MalformedSession`] if the session cannot be encoded
    /// - [`AuthError::StorageUnavailable`] if the storage refuses the write
    pub fn save(&self, session: &Session) -> Result<()> {
        let stored = StoredAuth {
            user_type: session.kind,
            data: session.clone(),
            timestamp: self.now().timestamp_millis(),
        };
        let json = serde_json::to_string(&stored)
            .map_err(|e| AuthError::MalformedSession(e.to_string()))?;

        self.storage.set_item(&self.config.storage_key, &json)?;
        self.write_cookies(session);

        tracing::info!(
            kind = ?session.kind,
            session_id = %session.session_id,
            expires_at = %session.expires_at,
            "Session saved"
        );
        Ok(())
    }

    /// Read the persisted session.
    ///
    /// Returns `None` when nothing is stored. A value that does not parse,
    /// or parses without an id and access token, is removed and `None` is
    /// returned. Expiry is not checked here; see [`SessionStore::current`].
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let raw = self.storage.get_item(&self.config.storage_key)?;

        match serde_json::from_str::<StoredAuth>(&raw) {
            Ok(stored) if has_identity(&stored.data) => Some(stored.data),
            Ok(_) => {
                tracing::warn!("Stored session lacks identifiers, clearing");
                self.clear();
                None
            },
            Err(error) => {
                tracing::warn!(%error, "Stored session is malformed, clearing");
                self.clear();
                None
            },
        }
    }

    /// Remove the persisted session and its cookies.
    pub fn clear(&self) {
        self.storage.remove_item(&self.config.storage_key);
        for suffix in cookie_names::ALL {
            self.cookies
                .set_cookie(AuthCookie::expired(self.config.cookie_name(suffix)));
        }
        tracing::info!("Session cleared");
    }

    /// Whether `session` is usable now.
    #[must_use]
    pub fn is_valid(&self, session: &Session) -> bool {
        is_session_valid(session, self.now())
    }

    /// The persisted session if it is usable now, without writing.
    ///
    /// Malformed or expired values read as `None` and stay where they are;
    /// [`SessionStore::current`] is the purging read.
    #[must_use]
    pub fn peek(&self) -> Option<Session> {
        let raw = self.storage.get_item(&self.config.storage_key)?;
        let stored = serde_json::from_str::<StoredAuth>(&raw).ok()?;
        Some(stored.data).filter(|session| self.is_valid(session))
    }

    /// The persisted session if it is usable now.
    ///
    /// An expired session is purged as a side effect.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        let session = self.load()?;
        if self.is_valid(&session) {
            return Some(session);
        }

        tracing::info!(
            session_id = %session.session_id,
            expired_at = %session.expires_at,
            "Session expired, purging"
        );
        self.clear();
        None
    }

    fn write_cookies(&self, session: &Session) {
        let expires = session.expires_at;
        let cookie = |suffix: &str, value: &str| {
            AuthCookie::new(self.config.cookie_name(suffix), value, expires)
        };

        self.cookies
            .set_cookie(cookie(cookie_names::SESSION_ID, &session.session_id));
        self.cookies
            .set_cookie(cookie(cookie_names::ACCESS_TOKEN, &session.access_token));
        match &session.refresh_token {
            Some(token) => self
                .cookies
                .set_cookie(cookie(cookie_names::REFRESH_TOKEN, token)),
            None => self.cookies.set_cookie(AuthCookie::expired(
                self.config.cookie_name(cookie_names::REFRESH_TOKEN),
            )),
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

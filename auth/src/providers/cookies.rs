//! Cookie jar trait.

use chrono::{DateTime, Utc};
use std::fmt;

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// `SameSite=Strict`
    Strict,
    /// `SameSite=Lax`
    Lax,
    /// `SameSite=None`
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        };
        f.write_str(value)
    }
}

/// A cookie mirroring part of the session for server-side reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Expiry; a past instant deletes the cookie.
    pub expires: DateTime<Utc>,
    /// Path attribute.
    pub path: String,
    /// `SameSite` attribute.
    pub same_site: SameSite,
}

impl AuthCookie {
    /// A root-path, `SameSite=Lax` cookie.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, expires: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires,
            path: "/".to_string(),
            same_site: SameSite::Lax,
        }
    }

    /// A cookie that deletes `name` (empty value, epoch expiry).
    #[must_use]
    pub fn expired(name: impl Into<String>) -> Self {
        Self::new(name, "", DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Whether this cookie deletes itself at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    /// `document.cookie` form of the cookie.
    ///
    /// # Examples
    ///
    /// ```
    /// use storefront_auth::providers::AuthCookie;
    ///
    /// let cookie = AuthCookie::expired("storefront_session_id");
    /// assert_eq!(
    ///     cookie.to_header_value(),
    ///     "storefront_session_id=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/; SameSite=Lax"
    /// );
    /// ```
    #[must_use]
    pub fn to_header_value(&self) -> String {
        format!(
            "{}={}; expires={}; path={}; SameSite={}",
            self.name,
            self.value,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.path,
            self.same_site
        )
    }
}

/// Cookie jar (the browser's `document.cookie`).
pub trait CookieJar: Send + Sync {
    /// Set or overwrite a cookie. An already-expired cookie deletes it.
    fn set_cookie(&self, cookie: AuthCookie);
}

//! Authentication constants.

/// Default storage key holding the persisted session.
pub const DEFAULT_STORAGE_KEY: &str = "storefront_auth";

/// Default prefix of the mirrored auth cookies.
pub const DEFAULT_COOKIE_PREFIX: &str = "storefront";

/// Google's OAuth 2.0 authorization endpoint.
pub const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Cookie name suffixes, appended to the configured prefix with `_`.
pub mod cookie_names {
    /// Session identifier cookie.
    pub const SESSION_ID: &str = "session_id";

    /// Access token cookie.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Refresh token cookie.
    pub const REFRESH_TOKEN: &str = "refresh_token";

    /// All suffixes, in the order they are written.
    pub const ALL: [&str; 3] = [SESSION_ID, ACCESS_TOKEN, REFRESH_TOKEN];
}

/// Session identifier prefixes.
pub mod id_prefixes {
    /// Guest session identifiers: `guest_<millis>_<random>`.
    pub const GUEST: &str = "guest";

    /// OAuth session identifiers minted client-side: `oauth_<millis>_<random>`.
    pub const OAUTH: &str = "oauth";
}

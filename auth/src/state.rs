//! Session and sign-in state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::ids::ProductId;

/// How the session was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Locally fabricated guest identity.
    Guest,
    /// Issued by the backend after an authorization-code exchange.
    #[serde(rename = "oauth", alias = "google")]
    OAuth,
}

/// Profile returned by the backend for an OAuth session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OAuthUser {
    /// Backend user id.
    #[serde(default)]
    pub id: Option<u64>,
    /// Username.
    #[serde(default)]
    pub username: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
}

/// The client's belief about who is acting.
///
/// A session is usable only while both identifiers are non-empty and
/// `expires_at` is in the future; see [`crate::session::is_session_valid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Guest or OAuth.
    #[serde(rename = "userType")]
    pub kind: SessionKind,

    /// Session identifier.
    pub session_id: String,

    /// Bearer token sent with cart requests.
    pub access_token: String,

    /// Refresh token, when one was issued.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Profile for OAuth sessions.
    #[serde(default)]
    pub user: Option<OAuthUser>,

    /// When the session was created.
    pub created_at: DateTime<Utc>,

    /// When the session stops being usable.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session's expiry is at or before `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Name shown in the header once signed in.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.kind {
            SessionKind::Guest => "Guest User".to_string(),
            SessionKind::OAuth => self
                .user
                .as_ref()
                .and_then(|user| user.email.clone().or_else(|| user.username.clone()))
                .unwrap_or_else(|| "Google User".to_string()),
        }
    }
}

/// The persisted envelope: `{userType, data, timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAuth {
    /// Session kind, duplicated at the top level.
    pub user_type: SessionKind,
    /// The session itself.
    pub data: Session,
    /// Milliseconds since the epoch when the value was written.
    pub timestamp: i64,
}

/// What must survive the OAuth redirect round trip.
///
/// Carried as JSON in the provider's `state` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectState {
    /// Product the user tried to add before signing in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    /// Page to return to once signed in.
    pub return_url: String,
}

impl RedirectState {
    /// Create a redirect state.
    #[must_use]
    pub fn new(product_id: Option<ProductId>, return_url: impl Into<String>) -> Self {
        Self {
            product_id,
            return_url: return_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use storefront_testing::test_clock;
    use storefront_core::environment::Clock;

    fn guest(now: DateTime<Utc>) -> Session {
        Session {
            kind: SessionKind::Guest,
            session_id: "guest_1_abc".into(),
            access_token: "guest_access_x".into(),
            refresh_token: Some("guest_refresh_x".into()),
            user: None,
            created_at: now,
            expires_at: now + chrono::Duration::days(30),
        }
    }

    #[test]
    fn test_stored_auth_uses_camel_case() {
        let now = test_clock().now();
        let stored = StoredAuth {
            user_type: SessionKind::Guest,
            data: guest(now),
            timestamp: now.timestamp_millis(),
        };

        let json: serde_json::Value = serde_json::to_value(&stored).unwrap();

        assert_eq!(json["userType"], "guest");
        assert_eq!(json["data"]["sessionId"], "guest_1_abc");
        assert_eq!(json["data"]["accessToken"], "guest_access_x");
        assert!(json["data"]["expiresAt"].is_string());
    }

    #[test]
    fn test_legacy_google_kind_is_accepted() {
        let kind: SessionKind = serde_json::from_str("\"google\"").unwrap();
        assert_eq!(kind, SessionKind::OAuth);
    }

    #[test]
    fn test_redirect_state_accepts_numeric_product() {
        let state: RedirectState =
            serde_json::from_str(r#"{"productId":42,"returnUrl":"https://x/y"}"#).unwrap();

        assert_eq!(state.product_id, Some(ProductId::from(42u64)));
        assert_eq!(state.return_url, "https://x/y");
    }

    #[test]
    fn test_display_name_prefers_email() {
        let now = test_clock().now();
        let mut session = guest(now);
        assert_eq!(session.display_name(), "Guest User");

        session.kind = SessionKind::OAuth;
        assert_eq!(session.display_name(), "Google User");

        session.user = Some(OAuthUser {
            email: Some("ada@example.com".into()),
            ..OAuthUser::default()
        });
        assert_eq!(session.display_name(), "ada@example.com");
    }
}

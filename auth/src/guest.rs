//! Guest sessions.
//!
//! Fabricated locally, no server round trip. The identifiers only need to be
//! unique per browser; they are not secrets.

use crate::constants::id_prefixes;
use crate::state::{Session, SessionKind};
use crate::utils::random_base36;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};

/// Create a guest session starting at `now` and lasting `ttl`.
///
/// - `session_id`: `guest_<millis>_<9 base36 chars>`
/// - `access_token`: `guest_access_<base64(session_id + "_" + millis)>`
/// - `refresh_token`: `guest_refresh_<base64(session_id + "_refresh_" + millis)>`
#[must_use]
pub fn create_guest_session(now: DateTime<Utc>, ttl: Duration) -> Session {
    let millis = now.timestamp_millis();
    let session_id = format!("{}_{millis}_{}", id_prefixes::GUEST, random_base36(9));
    let access_token = format!(
        "guest_access_{}",
        STANDARD.encode(format!("{session_id}_{millis}"))
    );
    let refresh_token = format!(
        "guest_refresh_{}",
        STANDARD.encode(format!("{session_id}_refresh_{millis}"))
    );

    Session {
        kind: SessionKind::Guest,
        session_id,
        access_token,
        refresh_token: Some(refresh_token),
        user: None,
        created_at: now,
        expires_at: now + ttl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::is_session_valid;
    use storefront_core::environment::Clock;
    use storefront_testing::test_clock;

    #[test]
    fn test_guest_session_shape() {
        let now = test_clock().now();
        let session = create_guest_session(now, Duration::days(30));
        let millis = now.timestamp_millis().to_string();

        assert_eq!(session.kind, SessionKind::Guest);
        let parts: Vec<&str> = session.session_id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "guest");
        assert_eq!(parts[1], millis);
        assert_eq!(parts[2].len(), 9);

        let encoded = session.access_token.strip_prefix("guest_access_");
        assert_eq!(
            encoded.and_then(|e| STANDARD.decode(e).ok()),
            Some(format!("{}_{millis}", session.session_id).into_bytes())
        );
        assert!(
            session
                .refresh_token
                .as_deref()
                .is_some_and(|t| t.starts_with("guest_refresh_"))
        );
        assert_eq!(session.expires_at - session.created_at, Duration::days(30));
    }

    #[test]
    fn test_guest_session_is_valid_until_expiry() {
        let now = test_clock().now();
        let session = create_guest_session(now, Duration::days(30));

        assert!(is_session_valid(&session, now));
        assert!(is_session_valid(&session, now + Duration::days(29)));
        assert!(!is_session_valid(&session, now + Duration::days(30)));
        assert!(!is_session_valid(&session, now + Duration::days(31)));
    }

    #[test]
    fn test_guest_sessions_are_distinct() {
        let now = test_clock().now();
        let a = create_guest_session(now, Duration::days(30));
        let b = create_guest_session(now, Duration::days(30));

        assert_ne!(a.session_id, b.session_id);
    }
}

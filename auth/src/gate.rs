//! Auth gate.
//!
//! Every mutating cart operation asks the gate first and sends nothing when
//! it answers [`GateDecision::Unauthorized`]. [`AuthGate::require_auth`]
//! does the whole check; reducers split it into the read
//! ([`AuthGate::check`]) and the deferred refusal ([`AuthGate::turn_away`]).

use crate::providers::LoginPrompt;
use crate::session::SessionStore;
use crate::state::Session;
use std::sync::Arc;

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// A usable session exists.
    Authorized(Session),
    /// No usable session.
    Unauthorized,
}

/// Pre-flight check gating mutating operations on a valid session.
#[derive(Clone)]
pub struct AuthGate {
    sessions: SessionStore,
    prompt: Arc<dyn LoginPrompt>,
}

impl AuthGate {
    /// Create a gate over `sessions` that surfaces `prompt` when needed.
    #[must_use]
    pub fn new(sessions: SessionStore, prompt: Arc<dyn LoginPrompt>) -> Self {
        Self { sessions, prompt }
    }

    /// The underlying session store.
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Check for a usable session, showing the login prompt when there is none.
    ///
    /// Expired sessions are purged. With a usable session there are no side
    /// effects.
    #[must_use]
    pub fn require_auth(&self) -> GateDecision {
        let decision = self.check();
        if decision == GateDecision::Unauthorized {
            self.turn_away();
        }
        decision
    }

    /// Decide without touching storage or the prompt.
    #[must_use]
    pub fn check(&self) -> GateDecision {
        self.sessions
            .peek()
            .map_or(GateDecision::Unauthorized, GateDecision::Authorized)
    }

    /// Refuse: purge a stale session and show the login prompt.
    ///
    /// Does nothing if a usable session appeared since the check.
    pub fn turn_away(&self) {
        if self.sessions.current().is_some() {
            return;
        }
        tracing::debug!("No usable session, showing login prompt");
        self.prompt.show();
    }

    /// The usable session, if any, without showing the prompt.
    ///
    /// Used for reads such as the initial cart load.
    #[must_use]
    pub fn peek(&self) -> Option<Session> {
        self.sessions.peek()
    }

    /// The server rejected our credentials (HTTP 401).
    ///
    /// The session is kept; the login prompt is shown so the user can pick
    /// a new one.
    pub fn on_unauthorized_response(&self) {
        tracing::warn!("Server rejected session credentials, showing login prompt");
        self.prompt.show();
    }

    /// Hide the login prompt.
    pub fn dismiss_prompt(&self) {
        self.prompt.hide();
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

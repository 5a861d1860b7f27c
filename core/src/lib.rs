//! # Storefront Core
//!
//! Core traits and types shared by every storefront crate.
//!
//! The storefront client is built as a unidirectional data flow:
//!
//! - **State**: what the page currently shows (cart lines, totals, toasts)
//! - **Action**: every input, user commands and the results of network calls alike
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: descriptions of side effects, executed by the runtime
//! - **Environment**: injected collaborators (HTTP clients, storage, clock)
//!
//! ## Example
//!
//! ```ignore
//! use storefront_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for BadgeReducer {
//!     type State = BadgeState;
//!     type Action = BadgeAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BadgeState,
//!         action: BadgeAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<BadgeAction>; 4]> {
//!         match action {
//!             BadgeAction::Set(count) => state.count = count,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the single place where state changes
///
/// Reducers are pure with respect to their inputs: given the same state,
/// action and environment they make the same decision. Anything that talks
/// to the outside world is returned as an [`Effect`](super::effect::Effect).
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for client logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The page state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// The effects to be executed by the runtime. Most actions produce
        /// zero to two effects, so they stay on the stack.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values, not execution.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially; each one finishes (cascades included)
        /// before the next starts
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (toast dismissal)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async computation
        #[must_use]
        pub fn future<F>(future: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(future))
        }

        /// Feed `action` straight back into the reducer
        #[must_use]
        pub fn send(action: Action) -> Effect<Action>
        where
            Action: Send + 'static,
        {
            Effect::future(async move { Some(action) })
        }

        /// Dispatch `action` after `duration`
        #[must_use]
        pub fn delay(duration: Duration, action: Action) -> Effect<Action> {
            Effect::Delay {
                duration,
                action: Box::new(action),
            }
        }

        /// Whether this is [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Session expiry and guest identifiers are derived from this clock, so
    /// tests can move time forward without sleeping.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

/// Identifiers shared across crates
pub mod ids {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    /// Product identifier
    ///
    /// The backend emits numeric primary keys while page markup and OAuth
    /// `state` carry them as strings, so both JSON forms deserialize into the
    /// same value. Serialization always produces a string.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ProductId(String);

    impl ProductId {
        /// Create a product id from its textual form
        #[must_use]
        pub fn new(id: impl Into<String>) -> Self {
            Self(id.into().trim().to_string())
        }

        /// Textual form
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }

        /// Whether the id is blank
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
    }

    impl fmt::Display for ProductId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl From<&str> for ProductId {
        fn from(id: &str) -> Self {
            Self::new(id)
        }
    }

    impl From<String> for ProductId {
        fn from(id: String) -> Self {
            Self::new(id)
        }
    }

    impl From<u64> for ProductId {
        fn from(id: u64) -> Self {
            Self(id.to_string())
        }
    }

    impl Serialize for ProductId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.0)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawProductId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    impl<'de> Deserialize<'de> for ProductId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(match RawProductId::deserialize(deserializer)? {
                RawProductId::Text(text) => Self::new(text),
                RawProductId::Unsigned(n) => Self(n.to_string()),
                RawProductId::Signed(n) => Self(n.to_string()),
            })
        }
    }
}

//! # Storefront Testing
//!
//! Testing utilities for storefront reducers and stores.
//!
//! This crate provides:
//! - A controllable clock for session expiry tests
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(CartReducer::new())
//!     .with_env(test_environment())
//!     .given_state(CartState::default())
//!     .when_action(CartAction::DismissToast { id: 7 })
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use storefront_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, RwLock};

    /// Fixed clock for deterministic tests
    ///
    /// Returns the same time until it is moved with [`FixedClock::set`] or
    /// [`FixedClock::advance`]. Clones share the same time, so a clock handed
    /// to a session store can be advanced from the test body.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::FixedClock;
    /// use storefront_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let start = clock.now();
    /// assert_eq!(start, clock.now());
    ///
    /// clock.advance(Duration::days(31));
    /// assert_eq!(clock.now() - start, Duration::days(31));
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: Arc<RwLock<DateTime<Utc>>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(RwLock::new(time)),
            }
        }

        /// Move the clock to `time`
        pub fn set(&self, time: DateTime<Utc>) {
            if let Ok(mut guard) = self.time.write() {
                *guard = time;
            }
        }

        /// Move the clock forward by `by`
        pub fn advance(&self, by: chrono::Duration) {
            if let Ok(mut guard) = self.time.write() {
                *guard += by;
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .read()
                .map_or_else(|poisoned| *poisoned.into_inner(), |guard| *guard)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};

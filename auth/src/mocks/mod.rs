//! Mock provider implementations for testing.
//!
//! In-memory implementations of every provider trait. Clones share state,
//! so a test keeps one handle for assertions and gives another to the code
//! under test.

pub mod browser;
pub mod token_exchange;

pub use browser::{MemoryStorage, RecordingCookieJar, RecordingLoginPrompt, RecordingNavigator};
pub use token_exchange::MockTokenExchange;

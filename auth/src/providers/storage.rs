//! Key-value storage trait.

use crate::error::Result;

/// Durable string storage (the browser's `localStorage`).
pub trait KeyValueStorage: Send + Sync {
    /// Read a value.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::StorageUnavailable`] when the storage
    /// refuses the write (quota, private mode).
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove_item(&self, key: &str);
}

//! User confirmation.

/// Asks the user to confirm a destructive operation.
pub trait Confirmer: Send + Sync {
    /// Show `message` and return whether the user agreed.
    fn confirm(&self, message: &str) -> bool;
}

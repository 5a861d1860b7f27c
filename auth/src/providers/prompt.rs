//! Login prompt trait.

/// The login / guest-selection modal.
pub trait LoginPrompt: Send + Sync {
    /// Show the modal. Showing an already visible modal is a no-op.
    fn show(&self);

    /// Hide the modal.
    fn hide(&self);
}

//! Navigation trait.

/// Browser location.
pub trait Navigator: Send + Sync {
    /// URL of the current page.
    fn current_url(&self) -> String;

    /// Leave the page for `url`.
    fn redirect(&self, url: &str);
}

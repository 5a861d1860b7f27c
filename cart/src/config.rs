//! Cart and notification configuration.

use std::time::Duration;

/// Backend used when `STOREFRONT_API_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Path of the opt-in single-request quantity endpoint.
pub const DEFAULT_SET_QUANTITY_PATH: &str = "/cart/set_quantity/";

/// How `UpdateQuantity` reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantityUpdate {
    /// Remove every unit of the line, then add the new quantity.
    ///
    /// Works against every backend but is not atomic: a failure between the
    /// two steps leaves the line missing or short.
    #[default]
    RemoveThenAdd,
    /// One request to the set-quantity endpoint. Only enable once the
    /// backend provides it.
    SetQuantity,
}

/// Cart client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Value sent in `X-CSRFToken`.
    pub csrf_token: String,
    /// Quantity-update strategy.
    pub quantity_update: QuantityUpdate,
    /// Path used by [`QuantityUpdate::SetQuantity`].
    pub set_quantity_path: String,
}

impl CartConfig {
    /// Configuration for `base_url` with `csrf_token`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            csrf_token: csrf_token.into(),
            quantity_update: QuantityUpdate::default(),
            set_quantity_path: DEFAULT_SET_QUANTITY_PATH.to_string(),
        }
    }

    /// Read the configuration from the environment.
    ///
    /// - `STOREFRONT_API_BASE_URL` (default [`DEFAULT_BASE_URL`])
    /// - `STOREFRONT_CSRF_TOKEN` (default empty)
    /// - `STOREFRONT_QUANTITY_UPDATE`: `set` selects [`QuantityUpdate::SetQuantity`]
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("STOREFRONT_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let csrf_token = std::env::var("STOREFRONT_CSRF_TOKEN").unwrap_or_default();
        let strategy = match std::env::var("STOREFRONT_QUANTITY_UPDATE").as_deref() {
            Ok("set" | "set_quantity") => QuantityUpdate::SetQuantity,
            _ => QuantityUpdate::RemoveThenAdd,
        };

        Self::new(base_url, csrf_token).with_quantity_update(strategy)
    }

    /// Select the quantity-update strategy.
    #[must_use]
    pub const fn with_quantity_update(mut self, strategy: QuantityUpdate) -> Self {
        self.quantity_update = strategy;
        self
    }

    /// Override the set-quantity path.
    #[must_use]
    pub fn with_set_quantity_path(mut self, path: impl Into<String>) -> Self {
        self.set_quantity_path = path.into();
        self
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, "")
    }
}

/// Toast layout and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationConfig {
    /// How long a toast stays up.
    pub lifetime: Duration,
    /// Offset of the first toast from the top edge, in pixels.
    pub base_offset: u32,
    /// Vertical distance between stacked toasts, in pixels.
    pub spacing: u32,
}

impl NotificationConfig {
    /// Override the toast lifetime.
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            lifetime: Duration::from_secs(3),
            base_offset: 20,
            spacing: 70,
        }
    }
}

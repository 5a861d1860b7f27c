//! Cart environment.

use crate::api::CartApi;
use crate::config::{CartConfig, NotificationConfig};
use crate::providers::Confirmer;
use std::sync::Arc;
use storefront_auth::providers::{Navigator, TokenExchange};
use storefront_auth::{AuthGate, OAuthRedirect};

/// Dependencies of the cart reducer.
///
/// Created once per page load; cloning shares every collaborator.
pub struct CartEnvironment<A, X> {
    /// Cart endpoints.
    pub api: Arc<A>,
    /// Authorization-code exchange.
    pub exchange: Arc<X>,
    /// Session gate.
    pub gate: AuthGate,
    /// OAuth redirect builder.
    pub oauth: OAuthRedirect,
    /// Confirmation dialog.
    pub confirmer: Arc<dyn Confirmer>,
    /// Browser location.
    pub navigator: Arc<dyn Navigator>,
    /// Cart client settings.
    pub config: CartConfig,
    /// Toast settings.
    pub notifications: NotificationConfig,
}

impl<A, X> CartEnvironment<A, X>
where
    A: CartApi,
    X: TokenExchange + 'static,
{
    /// Assemble an environment with default toast settings.
    #[must_use]
    pub fn new(
        api: A,
        exchange: X,
        gate: AuthGate,
        oauth: OAuthRedirect,
        confirmer: Arc<dyn Confirmer>,
        navigator: Arc<dyn Navigator>,
        config: CartConfig,
    ) -> Self {
        Self {
            api: Arc::new(api),
            exchange: Arc::new(exchange),
            gate,
            oauth,
            confirmer,
            navigator,
            config,
            notifications: NotificationConfig::default(),
        }
    }

    /// Override toast settings.
    #[must_use]
    pub fn with_notifications(mut self, notifications: NotificationConfig) -> Self {
        self.notifications = notifications;
        self
    }
}

impl<A, X> Clone for CartEnvironment<A, X> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            exchange: Arc::clone(&self.exchange),
            gate: self.gate.clone(),
            oauth: self.oauth.clone(),
            confirmer: Arc::clone(&self.confirmer),
            navigator: Arc::clone(&self.navigator),
            config: self.config.clone(),
            notifications: self.notifications,
        }
    }
}

//! Cart reducer.
//!
//! Wires the auth gate, the cart client, the summary projection and toasts
//! together.
//!
//! # Flow
//!
//! 1. A UI command arrives (`AddItem`, `ClearCart`, ...)
//! 2. Input is validated; invalid input is reported and nothing is sent
//! 3. The auth gate is asked; without a session the login prompt shows and
//!    nothing is sent
//! 4. Destructive commands ask for confirmation
//! 5. An effect performs the request and feeds back `MutationSucceeded` or
//!    `MutationFailed`
//! 6. Success reloads items and summary; `CartLoaded` recomputes the display
//!
//! State only changes on confirmed server answers; there is no optimistic
//! update and no automatic retry. `reduce` only reads the session; saving,
//! clearing and the login prompt happen in effects.

use crate::actions::CartAction;
use crate::api::{CartApi, CartMutation, perform};
use crate::checkout::CheckoutOrder;
use crate::environment::CartEnvironment;
use crate::error::CartError;
use crate::notify::Severity;
use crate::state::CartState;
use std::marker::PhantomData;
use std::sync::Arc;
use storefront_auth::providers::TokenExchange;
use storefront_auth::{
    AuthError, AuthGate, GateDecision, OAuthCallback, RedirectState, Session, SessionKind,
    complete_oauth_login, create_guest_session,
};
use storefront_core::effect::Effect;
use storefront_core::reducer::Reducer;
use storefront_core::{SmallVec, smallvec};

/// Confirmation text for removing a line.
pub const CONFIRM_REMOVE_ITEM: &str = "Remove this item from your cart?";

/// Confirmation text for clearing the cart.
pub const CONFIRM_CLEAR_CART: &str = "Are you sure you want to clear your cart?";

type Effects = SmallVec<[Effect<CartAction>; 4]>;

/// Cart reducer, generic over the cart client and the token exchange.
pub struct CartReducer<A, X> {
    _phantom: PhantomData<fn() -> (A, X)>,
}

impl<A, X> CartReducer<A, X> {
    /// Create a cart reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A, X> Default for CartReducer<A, X> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, X> Clone for CartReducer<A, X> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<A, X> std::fmt::Debug for CartReducer<A, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CartReducer")
    }
}

impl<A, X> CartReducer<A, X>
where
    A: CartApi,
    X: TokenExchange + 'static,
{
    /// Show a toast and schedule its dismissal.
    fn notify(
        state: &mut CartState,
        env: &CartEnvironment<A, X>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Effect<CartAction> {
        let id = state.toasts.push(message, severity, &env.notifications);
        Effect::delay(env.notifications.lifetime, CartAction::DismissToast { id })
    }

    /// Run `f` against the gate once the effect executes.
    fn with_gate<F>(env: &CartEnvironment<A, X>, f: F) -> Effect<CartAction>
    where
        F: FnOnce(&AuthGate) + Send + 'static,
    {
        let gate = env.gate.clone();
        Effect::future(async move {
            f(&gate);
            None
        })
    }

    /// Send the browser to `url`.
    fn navigate(env: &CartEnvironment<A, X>, url: String) -> Effect<CartAction> {
        let navigator = Arc::clone(&env.navigator);
        Effect::future(async move {
            navigator.redirect(&url);
            None
        })
    }

    /// Ask the gate; on refusal records it and returns the effect that
    /// shows the login prompt.
    fn authorize(
        state: &mut CartState,
        env: &CartEnvironment<A, X>,
    ) -> Result<Session, Effect<CartAction>> {
        match env.gate.check() {
            GateDecision::Authorized(session) => Ok(session),
            GateDecision::Unauthorized => {
                tracing::debug!("Cart mutation blocked by auth gate");
                state.last_error = Some(CartError::Unauthenticated);
                Err(Self::with_gate(env, AuthGate::turn_away))
            },
        }
    }

    fn invalid(
        state: &mut CartState,
        env: &CartEnvironment<A, X>,
        field: &str,
        message: &str,
    ) -> Effects {
        state.last_error = Some(CartError::Validation(vec![field.to_string()]));
        smallvec![Self::notify(state, env, message, Severity::Error)]
    }

    /// Effect that performs `mutation` with the session's token.
    fn mutate(
        env: &CartEnvironment<A, X>,
        session: Session,
        mutation: CartMutation,
    ) -> Effect<CartAction> {
        Self::mutate_then_navigate(env, session, mutation, None)
    }

    /// [`Self::mutate`], then leave for `return_url` as soon as the request
    /// settles rather than after its follow-up effects.
    fn mutate_then_navigate(
        env: &CartEnvironment<A, X>,
        session: Session,
        mutation: CartMutation,
        return_url: Option<String>,
    ) -> Effect<CartAction> {
        let api = Arc::clone(&env.api);
        let navigator = Arc::clone(&env.navigator);
        let strategy = env.config.quantity_update;
        let token = session.access_token;

        Effect::future(async move {
            tracing::debug!(?mutation, "Sending cart mutation");
            let outcome = perform(&*api, &token, &mutation, strategy).await;
            if let Some(url) = return_url {
                navigator.redirect(&url);
            }
            Some(match outcome {
                Ok(ack) => CartAction::MutationSucceeded { mutation, ack },
                Err(error) => CartAction::MutationFailed { mutation, error },
            })
        })
    }

    /// Gate, then mutate.
    fn gated(state: &mut CartState, env: &CartEnvironment<A, X>, mutation: CartMutation) -> Effects {
        match Self::authorize(state, env) {
            Ok(session) => smallvec![Self::mutate(env, session, mutation)],
            Err(refused) => smallvec![refused],
        }
    }

    /// Gate, confirm, then mutate.
    fn confirmed(
        state: &mut CartState,
        env: &CartEnvironment<A, X>,
        prompt: &str,
        mutation: CartMutation,
    ) -> Effects {
        let session = match Self::authorize(state, env) {
            Ok(session) => session,
            Err(refused) => return smallvec![refused],
        };

        if !env.confirmer.confirm(prompt) {
            tracing::debug!(?mutation, "User declined confirmation");
            state.last_error = Some(CartError::Cancelled);
            return smallvec![Effect::None];
        }

        smallvec![Self::mutate(env, session, mutation)]
    }

    fn load_cart(state: &mut CartState, env: &CartEnvironment<A, X>) -> Effects {
        let Some(session) = env.gate.peek() else {
            state.session_label = None;
            state.reset_cart();
            return smallvec![Effect::None];
        };

        state.session_label = Some(session.display_name());
        let api = Arc::clone(&env.api);
        let token = session.access_token;

        smallvec![Effect::future(async move {
            let (items, summary) = futures::join!(api.get_items(&token), api.summary(&token));
            Some(match items {
                Ok(items) => {
                    let summary = summary
                        .map_err(|error| {
                            tracing::warn!(%error, "Cart summary unavailable, using client totals");
                        })
                        .ok();
                    CartAction::CartLoaded { items, summary }
                },
                Err(error) => CartAction::CartLoadFailed { error },
            })
        })]
    }

    fn sign_in_failed(state: &mut CartState, env: &CartEnvironment<A, X>, error: AuthError) -> Effects {
        tracing::error!(%error, "Sign-in failed");
        let message = match error {
            AuthError::OAuthDenied(_) => "Sign-in was cancelled",
            _ => "Sign-in failed, please try again",
        };
        state.last_error = Some(CartError::Auth(error));
        smallvec![Self::notify(state, env, message, Severity::Error)]
    }
}

impl<A, X> Reducer for CartReducer<A, X>
where
    A: CartApi,
    X: TokenExchange + 'static,
{
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment<A, X>;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // LoadCart: read-only, never prompts
            // ═══════════════════════════════════════════════════════════════
            CartAction::LoadCart => Self::load_cart(state, env),

            CartAction::CartLoaded { items, summary } => {
                tracing::debug!(lines = items.len(), has_summary = summary.is_some(), "Cart loaded");
                state.apply_loaded(items, summary);
                smallvec![Effect::None]
            },

            CartAction::CartLoadFailed { error } => {
                tracing::error!(%error, "Failed to load cart");
                let unauthorized = error.is_unauthorized();
                state.last_error = Some(error);
                let mut effects: Effects =
                    smallvec![Self::notify(state, env, "Failed to load cart", Severity::Error)];
                if unauthorized {
                    effects.push(Self::with_gate(env, AuthGate::on_unauthorized_response));
                }
                effects
            },

            // ═══════════════════════════════════════════════════════════════
            // Mutations: validate, gate, (confirm), send
            // ═══════════════════════════════════════════════════════════════
            CartAction::AddItem {
                product_id,
                quantity,
            } => {
                if quantity == 0 {
                    return Self::invalid(state, env, "quantity", "Quantity must be at least 1");
                }
                match Self::authorize(state, env) {
                    Ok(session) => smallvec![Self::mutate(
                        env,
                        session,
                        CartMutation::Add {
                            product_id,
                            quantity,
                        }
                    )],
                    Err(refused) => {
                        state.pending_product = Some(product_id);
                        smallvec![refused]
                    },
                }
            },

            CartAction::IncreaseItem { product_id } => {
                Self::gated(state, env, CartMutation::Increase { product_id })
            },

            CartAction::DecreaseItem { product_id } => {
                Self::gated(state, env, CartMutation::Decrease { product_id })
            },

            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => {
                if quantity == 0 {
                    return Self::invalid(state, env, "quantity", "Quantity must be at least 1");
                }
                Self::gated(
                    state,
                    env,
                    CartMutation::UpdateQuantity {
                        product_id,
                        quantity,
                    },
                )
            },

            CartAction::RemoveItem { product_id } => Self::confirmed(
                state,
                env,
                CONFIRM_REMOVE_ITEM,
                CartMutation::Remove { product_id },
            ),

            CartAction::ClearCart => {
                Self::confirmed(state, env, CONFIRM_CLEAR_CART, CartMutation::Clear)
            },

            CartAction::ApplyCoupon { code } => {
                let code = code.trim().to_string();
                if code.is_empty() {
                    return Self::invalid(state, env, "code", "Please enter a coupon code");
                }
                Self::gated(state, env, CartMutation::ApplyCoupon { code })
            },

            CartAction::RemoveCoupon => {
                let Some(code) = state.applied_coupon().map(str::to_string) else {
                    return smallvec![Self::notify(
                        state,
                        env,
                        "No coupon applied",
                        Severity::Info
                    )];
                };
                Self::gated(state, env, CartMutation::RemoveCoupon { code })
            },

            CartAction::MutationSucceeded { mutation, ack } => {
                tracing::info!(?mutation, server_message = ?ack.message, "Cart mutation confirmed");
                state.last_error = None;
                smallvec![
                    Self::notify(state, env, mutation.success_message(), Severity::Success),
                    Effect::send(CartAction::LoadCart),
                ]
            },

            CartAction::MutationFailed { mutation, error } => {
                tracing::error!(?mutation, %error, "Cart mutation failed");
                let message = error
                    .server_message()
                    .unwrap_or_else(|| mutation.failure_message())
                    .to_string();
                let unauthorized = error.is_unauthorized();
                // an unreadable 2xx body may still have changed the cart
                let reload = mutation.is_multi_step(env.config.quantity_update)
                    || matches!(error, CartError::MalformedResponse(_));
                state.last_error = Some(error);

                let mut effects: Effects =
                    smallvec![Self::notify(state, env, message, Severity::Error)];
                if unauthorized {
                    effects.push(Self::with_gate(env, AuthGate::on_unauthorized_response));
                }
                if reload {
                    effects.push(Effect::send(CartAction::LoadCart));
                }
                effects
            },

            // ═══════════════════════════════════════════════════════════════
            // Sign-in
            // ═══════════════════════════════════════════════════════════════
            CartAction::ContinueAsGuest => {
                let sessions = env.gate.sessions();
                let session =
                    create_guest_session(sessions.now(), sessions.config().guest_session_ttl);
                let redirect = RedirectState::new(state.pending_product.clone(), "");
                let gate = env.gate.clone();

                smallvec![Effect::future(async move {
                    Some(match gate.sessions().save(&session) {
                        Ok(()) => {
                            gate.dismiss_prompt();
                            CartAction::SignedIn { session, redirect }
                        },
                        Err(error) => CartAction::SignInFailed { error },
                    })
                })]
            },

            CartAction::SignInWithProvider => {
                let redirect =
                    RedirectState::new(state.pending_product.clone(), env.navigator.current_url());
                match env.oauth.authorization_url(&redirect) {
                    Ok(url) => {
                        tracing::info!("Redirecting to identity provider");
                        smallvec![Self::navigate(env, url)]
                    },
                    Err(error) => Self::sign_in_failed(state, env, error),
                }
            },

            CartAction::OAuthCallback { query } => match OAuthCallback::parse(&query) {
                Ok(callback) => {
                    let exchange = Arc::clone(&env.exchange);
                    let gate = env.gate.clone();
                    let redirect_uri = env.oauth.config().redirect_uri.clone();

                    smallvec![Effect::future(async move {
                        Some(
                            match complete_oauth_login(
                                &*exchange,
                                gate.sessions(),
                                &redirect_uri,
                                &callback.code,
                            )
                            .await
                            {
                                Ok(session) => {
                                    gate.dismiss_prompt();
                                    CartAction::SignedIn {
                                        session,
                                        redirect: callback.state,
                                    }
                                },
                                Err(error) => CartAction::SignInFailed { error },
                            },
                        )
                    })]
                },
                Err(error) => Self::sign_in_failed(state, env, error),
            },

            CartAction::SignedIn { session, redirect } => {
                let name = session.display_name();
                state.session_label = Some(name.clone());
                state.pending_product = None;

                let greeting = match session.kind {
                    SessionKind::Guest => {
                        Self::notify(state, env, "Continuing as guest", Severity::Info)
                    },
                    SessionKind::OAuth => {
                        Self::notify(state, env, format!("Signed in as {name}"), Severity::Success)
                    },
                };
                let return_url = Some(redirect.return_url).filter(|url| !url.is_empty());

                match redirect.product_id {
                    Some(product_id) => smallvec![
                        greeting,
                        Self::mutate_then_navigate(
                            env,
                            session,
                            CartMutation::Add {
                                product_id,
                                quantity: 1,
                            },
                            return_url,
                        ),
                    ],
                    None => {
                        let mut effects: Effects =
                            smallvec![greeting, Effect::send(CartAction::LoadCart)];
                        if let Some(url) = return_url {
                            effects.push(Self::navigate(env, url));
                        }
                        effects
                    },
                }
            },

            CartAction::SignInFailed { error } => Self::sign_in_failed(state, env, error),

            CartAction::Logout => {
                state.session_label = None;
                state.pending_product = None;
                state.reset_cart();
                smallvec![
                    Self::with_gate(env, |gate| gate.sessions().clear()),
                    Self::notify(state, env, "Signed out", Severity::Info),
                ]
            },

            CartAction::DismissLoginPrompt => {
                state.pending_product = None;
                smallvec![Self::with_gate(env, AuthGate::dismiss_prompt)]
            },

            // ═══════════════════════════════════════════════════════════════
            // Toasts
            // ═══════════════════════════════════════════════════════════════
            CartAction::Notify { message, severity } => {
                smallvec![Self::notify(state, env, message, severity)]
            },

            CartAction::DismissToast { id } => {
                state.toasts.dismiss(id, &env.notifications);
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Checkout
            // ═══════════════════════════════════════════════════════════════
            CartAction::SubmitCheckout { details } => {
                if state.items.is_empty() {
                    return Self::invalid(state, env, "cart", "Your cart is empty");
                }

                if let Err(error) = details.validate() {
                    if let CartError::Validation(fields) = &error {
                        state.checkout_errors.clone_from(fields);
                    }
                    state.last_error = Some(error);
                    return smallvec![Self::notify(
                        state,
                        env,
                        "Please fill in all required fields",
                        Severity::Error
                    )];
                }

                state.checkout_errors.clear();
                state.checkout = Some(CheckoutOrder {
                    details,
                    items: state.items.clone(),
                    totals: state.display.clone(),
                    submitted_at: env.gate.sessions().now(),
                });
                tracing::info!(lines = state.items.len(), "Checkout submitted");
                smallvec![Self::notify(state, env, "Order submitted", Severity::Success)]
            },
        }
    }
}

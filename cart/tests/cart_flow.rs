//! End-to-end cart flows: store, reducer, auth gate and the in-memory backend.

#![allow(clippy::unwrap_used)]

use chrono::Duration as ChronoDuration;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use storefront_auth::mocks::{
    MemoryStorage, MockTokenExchange, RecordingCookieJar, RecordingLoginPrompt, RecordingNavigator,
};
use storefront_auth::{AuthGate, OAuthConfig, OAuthRedirect, SessionConfig, SessionStore};
use storefront_cart::mocks::{InMemoryCartBackend, ScriptedConfirmer, endpoints};
use storefront_cart::reducer::{CONFIRM_CLEAR_CART, CONFIRM_REMOVE_ITEM};
use storefront_cart::{
    CartAction, CartConfig, CartEnvironment, CartError, CartReducer, CartState, CheckoutDetails,
    NotificationConfig, QuantityUpdate, Severity, TotalsSource,
};
use storefront_catalog::Product;
use storefront_core::ids::ProductId;
use storefront_runtime::Store;
use storefront_testing::{FixedClock, test_clock};

type Env = CartEnvironment<InMemoryCartBackend, MockTokenExchange>;
type CartStore = Store<CartState, CartAction, Env, CartReducer<InMemoryCartBackend, MockTokenExchange>>;

struct Harness {
    clock: FixedClock,
    backend: InMemoryCartBackend,
    prompt: RecordingLoginPrompt,
    confirmer: ScriptedConfirmer,
    navigator: RecordingNavigator,
    store: CartStore,
}

/// `RUST_LOG=storefront_cart=debug cargo test` shows the reducer's decisions.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn harness_with(config: CartConfig) -> Harness {
    build(config, Duration::from_millis(10))
}

fn build(config: CartConfig, toast_lifetime: Duration) -> Harness {
    init_tracing();
    let clock = test_clock();
    let backend = InMemoryCartBackend::new()
        .with_product(Product::new(1u64, "Desk lamp", Decimal::new(500, 0)))
        .with_product(Product::new(2u64, "Notebook", Decimal::new(300, 0)))
        .with_product(Product::new(42u64, "Fountain pen", Decimal::new(100, 0)))
        .with_coupon("SAVE10", Decimal::TEN);
    let prompt = RecordingLoginPrompt::new();
    let confirmer = ScriptedConfirmer::accepting();
    let navigator = RecordingNavigator::new("https://x/y");

    let sessions = SessionStore::new(
        Arc::new(MemoryStorage::new()),
        Arc::new(RecordingCookieJar::new()),
        Arc::new(clock.clone()),
        SessionConfig::default(),
    );
    let env = CartEnvironment::new(
        backend.clone(),
        MockTokenExchange::new(),
        AuthGate::new(sessions, Arc::new(prompt.clone())),
        OAuthRedirect::new(OAuthConfig::new(
            "client-123",
            "https://shop.example/accounts/google/login/callback/",
        )),
        Arc::new(confirmer.clone()),
        Arc::new(navigator.clone()),
        config,
    )
    .with_notifications(NotificationConfig::default().with_lifetime(toast_lifetime));

    Harness {
        clock,
        backend,
        prompt,
        confirmer,
        navigator,
        store: Store::new(CartState::new(), CartReducer::new(), env),
    }
}

fn harness() -> Harness {
    harness_with(CartConfig::default())
}

impl Harness {
    async fn dispatch(&self, action: CartAction) {
        let mut handle = self.store.send(action).await.unwrap();
        handle
            .wait_with_timeout(Duration::from_secs(5))
            .await
            .unwrap();
    }

    async fn state(&self) -> CartState {
        self.store.state(CartState::clone).await
    }

    async fn sign_in_as_guest(&self) {
        self.dispatch(CartAction::ContinueAsGuest).await;
    }

    fn access_token(&self) -> String {
        self.store.environment().gate.peek().unwrap().access_token
    }

    async fn last_toast(&self) -> (String, Severity) {
        self.store
            .state(|s| {
                let toast = s.toasts.last().unwrap();
                (toast.message.clone(), toast.severity)
            })
            .await
    }
}

fn pid(id: u64) -> ProductId {
    ProductId::from(id)
}

/// Play the provider: read our outbound URL and build its callback query.
fn provider_callback(authorization_url: &str, code: &str) -> String {
    let (_, query) = authorization_url.split_once('?').unwrap();
    let params: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap();
    let state = params
        .into_iter()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value)
        .unwrap();
    serde_urlencoded::to_string([("code", code), ("state", state.as_str())]).unwrap()
}

#[tokio::test]
async fn test_add_without_session_prompts_and_sends_nothing() {
    let h = harness();

    h.dispatch(CartAction::AddItem {
        product_id: pid(42),
        quantity: 1,
    })
    .await;

    assert!(h.backend.requests().is_empty());
    assert!(h.prompt.is_visible());
    let state = h.state().await;
    assert_eq!(state.pending_product, Some(pid(42)));
    assert!(state.items.is_empty());
}

#[tokio::test]
async fn test_guest_sign_in_completes_the_pending_add() {
    let h = harness();
    h.dispatch(CartAction::AddItem {
        product_id: pid(42),
        quantity: 1,
    })
    .await;

    h.sign_in_as_guest().await;

    assert_eq!(h.backend.lines(), vec![(pid(42), 1)]);
    assert!(!h.prompt.is_visible());
    let state = h.state().await;
    assert_eq!(state.session_label.as_deref(), Some("Guest User"));
    assert_eq!(state.pending_product, None);
    assert_eq!(state.display.item_count, 1);
}

#[tokio::test]
async fn test_load_without_session_is_silent() {
    let h = harness();

    h.dispatch(CartAction::LoadCart).await;

    assert!(h.backend.requests().is_empty());
    assert_eq!(h.prompt.show_count(), 0);
    assert_eq!(h.state().await.display.item_count, 0);
}

#[tokio::test]
async fn test_increase_then_decrease_restores_the_cart() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(1u64, 2);
    h.dispatch(CartAction::LoadCart).await;
    let before = h.state().await.items;

    h.dispatch(CartAction::IncreaseItem { product_id: pid(1) }).await;
    assert_eq!(h.state().await.quantity_of(&pid(1)), 3);

    h.dispatch(CartAction::DecreaseItem { product_id: pid(1) }).await;
    assert_eq!(h.state().await.items, before);
}

#[tokio::test]
async fn test_decrease_at_one_removes_the_line() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(2u64, 1);
    h.dispatch(CartAction::LoadCart).await;

    h.dispatch(CartAction::DecreaseItem { product_id: pid(2) }).await;

    assert!(h.state().await.items.is_empty());
}

#[tokio::test]
async fn test_update_quantity_leaves_a_single_row() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(1u64, 2);
    h.dispatch(CartAction::LoadCart).await;

    h.dispatch(CartAction::UpdateQuantity {
        product_id: pid(1),
        quantity: 5,
    })
    .await;

    assert_eq!(h.backend.lines(), vec![(pid(1), 5)]);
    let state = h.state().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.quantity_of(&pid(1)), 5);
    assert_eq!(h.backend.request_count(endpoints::DECREASE_ITEM), 2);
}

#[tokio::test]
async fn test_update_quantity_reads_the_server_line_not_the_last_load() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.dispatch(CartAction::LoadCart).await;
    // changed elsewhere after this page loaded
    h.backend.seed_line(1u64, 3);

    h.dispatch(CartAction::UpdateQuantity {
        product_id: pid(1),
        quantity: 2,
    })
    .await;

    assert_eq!(h.backend.lines(), vec![(pid(1), 2)]);
    assert_eq!(h.backend.request_count(endpoints::DECREASE_ITEM), 3);
    assert_eq!(h.state().await.quantity_of(&pid(1)), 2);
}

#[tokio::test]
async fn test_removal_reads_the_server_line_not_the_last_load() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(2u64, 1);
    h.dispatch(CartAction::LoadCart).await;
    h.backend.seed_line(1u64, 3);

    h.dispatch(CartAction::RemoveItem { product_id: pid(1) }).await;

    assert_eq!(h.backend.lines(), vec![(pid(2), 1)]);
    assert_eq!(h.backend.request_count(endpoints::DECREASE_ITEM), 3);
    assert_eq!(
        h.last_toast().await,
        ("Item removed from cart".to_string(), Severity::Success)
    );
}

#[tokio::test]
async fn test_set_quantity_strategy_uses_one_request() {
    let h = harness_with(CartConfig::default().with_quantity_update(QuantityUpdate::SetQuantity));
    h.sign_in_as_guest().await;
    h.backend.seed_line(1u64, 2);
    h.dispatch(CartAction::LoadCart).await;

    h.dispatch(CartAction::UpdateQuantity {
        product_id: pid(1),
        quantity: 4,
    })
    .await;

    assert_eq!(h.backend.lines(), vec![(pid(1), 4)]);
    assert_eq!(h.backend.request_count(endpoints::SET_QUANTITY), 1);
    assert_eq!(h.backend.request_count(endpoints::DECREASE_ITEM), 0);
}

#[tokio::test]
async fn test_failed_second_step_reloads_the_server_view() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(1u64, 1);
    h.dispatch(CartAction::LoadCart).await;
    h.backend
        .fail_next(endpoints::ADD_ITEM, CartError::Transport("connection reset".into()));

    h.dispatch(CartAction::UpdateQuantity {
        product_id: pid(1),
        quantity: 3,
    })
    .await;

    // The decrement went through before the add failed.
    assert!(h.backend.lines().is_empty());
    assert!(h.state().await.items.is_empty());
    assert_eq!(
        h.last_toast().await,
        ("Failed to update quantity".to_string(), Severity::Error)
    );
}

#[tokio::test]
async fn test_coupon_totals_come_from_the_server() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(1u64, 2);

    h.dispatch(CartAction::ApplyCoupon {
        code: " save10 ".into(),
    })
    .await;

    let display = h.state().await.display;
    assert_eq!(display.subtotal, Decimal::new(1000, 0));
    assert_eq!(display.discount, Decimal::new(100, 0));
    assert_eq!(display.total, Decimal::new(900, 0));
    assert_eq!(display.applied_coupon.as_deref(), Some("SAVE10"));
    assert!(display.coupon_controls_visible);
    assert_eq!(display.source, TotalsSource::Server);

    h.dispatch(CartAction::RemoveCoupon).await;

    let display = h.state().await.display;
    assert_eq!(display.total, Decimal::new(1000, 0));
    assert_eq!(display.applied_coupon, None);
    assert!(!display.coupon_controls_visible);
    assert_eq!(h.backend.applied_coupon(), None);
}

#[tokio::test]
async fn test_unknown_coupon_shows_server_message() {
    let h = harness();
    h.sign_in_as_guest().await;

    h.dispatch(CartAction::ApplyCoupon {
        code: "BOGUS".into(),
    })
    .await;

    assert_eq!(
        h.last_toast().await,
        ("Invalid coupon code".to_string(), Severity::Error)
    );
    assert_eq!(h.state().await.display.applied_coupon, None);
}

#[tokio::test]
async fn test_missing_summary_falls_back_to_line_totals() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(1u64, 1);
    h.backend.seed_line(2u64, 2);
    h.backend.set_summary_unavailable(true);

    h.dispatch(CartAction::LoadCart).await;

    let display = h.state().await.display;
    assert_eq!(display.source, TotalsSource::ClientFallback);
    assert_eq!(display.total, Decimal::new(1100, 0));
    assert_eq!(display.item_count, 3);
}

#[tokio::test]
async fn test_declined_removal_sends_nothing() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(1u64, 2);
    h.dispatch(CartAction::LoadCart).await;
    h.confirmer.push_answer(false);

    h.dispatch(CartAction::RemoveItem { product_id: pid(1) }).await;

    assert_eq!(h.backend.mutation_count(), 0);
    assert_eq!(h.state().await.quantity_of(&pid(1)), 2);
    assert_eq!(h.confirmer.prompts(), vec![CONFIRM_REMOVE_ITEM]);
}

#[tokio::test]
async fn test_confirmed_removal_drops_the_whole_line() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(1u64, 3);
    h.backend.seed_line(2u64, 1);
    h.dispatch(CartAction::LoadCart).await;

    h.dispatch(CartAction::RemoveItem { product_id: pid(1) }).await;

    assert_eq!(h.backend.lines(), vec![(pid(2), 1)]);
    assert_eq!(h.backend.request_count(endpoints::DECREASE_ITEM), 3);
    assert_eq!(h.state().await.display.item_count, 1);
}

#[tokio::test]
async fn test_clear_cart_after_confirmation() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(1u64, 1);
    h.backend.seed_line(2u64, 4);
    h.dispatch(CartAction::LoadCart).await;

    h.dispatch(CartAction::ClearCart).await;

    assert!(h.backend.lines().is_empty());
    assert!(h.state().await.items.is_empty());
    assert_eq!(h.confirmer.prompts(), vec![CONFIRM_CLEAR_CART]);
    assert_eq!(
        h.last_toast().await,
        ("Cart cleared".to_string(), Severity::Success)
    );
}

#[tokio::test]
async fn test_oauth_round_trip_adds_pending_product_and_returns() {
    let h = harness();
    h.dispatch(CartAction::AddItem {
        product_id: pid(42),
        quantity: 1,
    })
    .await;

    h.dispatch(CartAction::SignInWithProvider).await;
    let authorization_url = h.navigator.last_redirect().unwrap();
    assert!(authorization_url.contains("client_id=client-123"));

    h.dispatch(CartAction::OAuthCallback {
        query: provider_callback(&authorization_url, "auth-code"),
    })
    .await;

    assert_eq!(h.backend.lines(), vec![(pid(42), 1)]);
    assert_eq!(h.navigator.last_redirect().as_deref(), Some("https://x/y"));
    assert!(!h.prompt.is_visible());
    let state = h.state().await;
    assert_eq!(state.session_label.as_deref(), Some("ada@example.com"));
    assert_eq!(state.display.item_count, 1);
}

#[tokio::test]
async fn test_oauth_return_does_not_wait_for_toasts() {
    let h = build(CartConfig::default(), Duration::from_secs(60));
    h.dispatch(CartAction::AddItem {
        product_id: pid(42),
        quantity: 1,
    })
    .await;
    h.dispatch(CartAction::SignInWithProvider).await;
    let authorization_url = h.navigator.last_redirect().unwrap();

    let _pending = h
        .store
        .send(CartAction::OAuthCallback {
            query: provider_callback(&authorization_url, "auth-code"),
        })
        .await
        .unwrap();

    let returned = tokio::time::timeout(Duration::from_secs(5), async {
        while h.navigator.last_redirect().as_deref() != Some("https://x/y") {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    assert!(returned.is_ok(), "return redirect waited for the toast lifetime");
    assert_eq!(h.backend.lines(), vec![(pid(42), 1)]);
}

#[tokio::test]
async fn test_guest_session_expires_after_thirty_days() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(1u64, 1);

    h.clock.advance(ChronoDuration::days(31));
    h.dispatch(CartAction::IncreaseItem { product_id: pid(1) }).await;

    assert_eq!(h.backend.mutation_count(), 0);
    assert!(h.prompt.is_visible());
    assert!(h.store.environment().gate.peek().is_none());
    assert!(h.store.environment().gate.sessions().load().is_none());
}

#[tokio::test]
async fn test_rejected_token_prompts_but_keeps_session() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.reject_token(&h.access_token());

    h.dispatch(CartAction::AddItem {
        product_id: pid(1),
        quantity: 1,
    })
    .await;

    assert!(h.prompt.is_visible());
    assert!(h.store.environment().gate.peek().is_some());
    assert_eq!(h.state().await.last_error, Some(CartError::Unauthorized));
}

#[tokio::test]
async fn test_logout_then_add_prompts_again() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.dispatch(CartAction::Logout).await;
    let requests_before = h.backend.requests().len();

    h.dispatch(CartAction::AddItem {
        product_id: pid(2),
        quantity: 1,
    })
    .await;

    assert_eq!(h.backend.requests().len(), requests_before);
    assert!(h.prompt.is_visible());
}

#[tokio::test]
async fn test_toasts_dismiss_themselves() {
    let h = harness();

    h.dispatch(CartAction::Notify {
        message: "Saved".into(),
        severity: Severity::Info,
    })
    .await;

    let state = h.state().await;
    assert!(state.toasts.is_empty());
    assert_eq!(state.toasts.last().map(|t| t.message.as_str()), Some("Saved"));
}

#[tokio::test]
async fn test_checkout_snapshots_loaded_cart() {
    let h = harness();
    h.sign_in_as_guest().await;
    h.backend.seed_line(2u64, 2);
    h.dispatch(CartAction::LoadCart).await;

    h.dispatch(CartAction::SubmitCheckout {
        details: CheckoutDetails {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            country: "UK".into(),
            address: "12 St James's Square".into(),
            city: "London".into(),
            mobile: "+44 20 0000 0000".into(),
            email: Some("ada@example.com".into()),
            ..CheckoutDetails::default()
        },
    })
    .await;

    let order = h.state().await.checkout.unwrap();
    assert_eq!(order.totals.total, Decimal::new(600, 0));
    assert_eq!(order.items[0].quantity, 2);
}

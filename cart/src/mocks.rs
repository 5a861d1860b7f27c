//! In-memory cart backend and scripted providers for testing.
//!
//! Clones share state, so a test keeps one handle for assertions and gives
//! another to the environment.

use crate::api::CartApi;
use crate::error::{CartError, Result};
use crate::providers::Confirmer;
use crate::types::{ApiAck, AppliedCoupon, CartItem, CartSummary};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};
use storefront_catalog::Product;
use storefront_core::ids::ProductId;

/// Endpoint names recorded by [`InMemoryCartBackend::requests`].
pub mod endpoints {
    /// `get_items`
    pub const GET_ITEMS: &str = "get_items";
    /// `summary`
    pub const SUMMARY: &str = "summary";
    /// `add_item`
    pub const ADD_ITEM: &str = "add_item";
    /// `increase_item`
    pub const INCREASE_ITEM: &str = "increase_item";
    /// `decrease_item`
    pub const DECREASE_ITEM: &str = "decrease_item";
    /// `set_quantity`
    pub const SET_QUANTITY: &str = "set_quantity";
    /// `clear_cart`
    pub const CLEAR_CART: &str = "clear_cart";
    /// `apply_coupon`
    pub const APPLY_COUPON: &str = "apply_coupon";
    /// `remove_coupon`
    pub const REMOVE_COUPON: &str = "remove_coupon";

    /// Endpoints that change the cart.
    pub const MUTATING: [&str; 7] = [
        ADD_ITEM,
        INCREASE_ITEM,
        DECREASE_ITEM,
        SET_QUANTITY,
        CLEAR_CART,
        APPLY_COUPON,
        REMOVE_COUPON,
    ];
}

#[derive(Debug, Default)]
struct Backend {
    catalog: HashMap<ProductId, Product>,
    lines: Vec<(ProductId, u32)>,
    coupons: HashMap<String, Decimal>,
    applied: Option<String>,
    requests: Vec<String>,
    failures: HashMap<String, CartError>,
    summary_unavailable: bool,
    rejected_tokens: HashSet<String>,
}

impl Backend {
    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut (ProductId, u32)> {
        self.lines.iter_mut().find(|(id, _)| id == product_id)
    }

    fn total(&self) -> Decimal {
        self.lines
            .iter()
            .filter_map(|(id, quantity)| {
                self.catalog
                    .get(id)
                    .map(|product| product.price * Decimal::from(*quantity))
            })
            .sum()
    }

    fn discount(&self, total: Decimal) -> Decimal {
        self.applied
            .as_ref()
            .and_then(|code| self.coupons.get(code))
            .map_or(Decimal::ZERO, |percent| {
                (total * *percent / Decimal::ONE_HUNDRED).round_dp(2)
            })
    }
}

fn not_found(message: &str) -> CartError {
    CartError::Rejected {
        status: 404,
        message: Some(message.to_string()),
    }
}

fn bad_request(message: &str) -> CartError {
    CartError::Rejected {
        status: 400,
        message: Some(message.to_string()),
    }
}

/// Cart backend with the server's semantics, kept in memory.
///
/// - Decreasing a line at one unit removes it
/// - Coupons are percentages, matched case-insensitively; one applies at a time
/// - Tokens marked with [`reject_token`](Self::reject_token) answer 401
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartBackend {
    inner: Arc<Mutex<Backend>>,
}

impl InMemoryCartBackend {
    /// Empty backend with no products.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `product` available to add.
    #[must_use]
    pub fn with_product(self, product: Product) -> Self {
        if let Ok(mut backend) = self.inner.lock() {
            backend.catalog.insert(product.id.clone(), product);
        }
        self
    }

    /// Accept `code` for `percent` off.
    #[must_use]
    pub fn with_coupon(self, code: &str, percent: Decimal) -> Self {
        if let Ok(mut backend) = self.inner.lock() {
            backend.coupons.insert(code.to_uppercase(), percent);
        }
        self
    }

    /// Put `quantity` units on the server cart without a request.
    pub fn seed_line(&self, product_id: impl Into<ProductId>, quantity: u32) {
        if let Ok(mut backend) = self.inner.lock() {
            backend.lines.push((product_id.into(), quantity));
        }
    }

    /// Server-side lines.
    #[must_use]
    pub fn lines(&self) -> Vec<(ProductId, u32)> {
        self.inner
            .lock()
            .map(|backend| backend.lines.clone())
            .unwrap_or_default()
    }

    /// Code of the applied coupon.
    #[must_use]
    pub fn applied_coupon(&self) -> Option<String> {
        self.inner.lock().ok()?.applied.clone()
    }

    /// Every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|backend| backend.requests.clone())
            .unwrap_or_default()
    }

    /// How many times `endpoint` was called.
    #[must_use]
    pub fn request_count(&self, endpoint: &str) -> usize {
        self.requests().iter().filter(|name| *name == endpoint).count()
    }

    /// How many requests changed (or tried to change) the cart.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.requests()
            .iter()
            .filter(|name| endpoints::MUTATING.contains(&name.as_str()))
            .count()
    }

    /// Fail the next call to `endpoint` with `error`.
    pub fn fail_next(&self, endpoint: &str, error: CartError) {
        if let Ok(mut backend) = self.inner.lock() {
            backend.failures.insert(endpoint.to_string(), error);
        }
    }

    /// Make the summary endpoint fail until reset.
    pub fn set_summary_unavailable(&self, unavailable: bool) {
        if let Ok(mut backend) = self.inner.lock() {
            backend.summary_unavailable = unavailable;
        }
    }

    /// Answer 401 for `access_token`.
    pub fn reject_token(&self, access_token: &str) {
        if let Ok(mut backend) = self.inner.lock() {
            backend.rejected_tokens.insert(access_token.to_string());
        }
    }

    /// Record the request, apply scripted failures, then run `handler`.
    fn handle<T>(
        &self,
        endpoint: &str,
        access_token: &str,
        handler: impl FnOnce(&mut Backend) -> Result<T>,
    ) -> Result<T> {
        let mut backend = self
            .inner
            .lock()
            .map_err(|_| CartError::Transport("Mutex lock failed".to_string()))?;

        backend.requests.push(endpoint.to_string());
        if backend.rejected_tokens.contains(access_token) {
            return Err(CartError::Unauthorized);
        }
        if let Some(error) = backend.failures.remove(endpoint) {
            return Err(error);
        }
        handler(&mut backend)
    }
}

impl CartApi for InMemoryCartBackend {
    fn get_items(&self, access_token: &str) -> impl Future<Output = Result<Vec<CartItem>>> + Send {
        let result = self.handle(endpoints::GET_ITEMS, access_token, |backend| {
            Ok(backend
                .lines
                .iter()
                .filter_map(|(id, quantity)| {
                    backend.catalog.get(id).map(|product| CartItem {
                        product: product.clone(),
                        quantity: *quantity,
                    })
                })
                .collect())
        });
        async move { result }
    }

    fn summary(&self, access_token: &str) -> impl Future<Output = Result<CartSummary>> + Send {
        let result = self.handle(endpoints::SUMMARY, access_token, |backend| {
            if backend.summary_unavailable {
                return Err(CartError::Rejected {
                    status: 500,
                    message: None,
                });
            }
            let cart_total = backend.total();
            let discount_amount = backend.discount(cart_total);
            Ok(CartSummary {
                cart_total,
                discount_amount,
                final_amount: cart_total - discount_amount,
                applied_coupon: backend.applied.clone().map(|code| AppliedCoupon {
                    code,
                    discount_amount: Some(discount_amount),
                }),
            })
        });
        async move { result }
    }

    fn add_item(
        &self,
        access_token: &str,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<ApiAck>> + Send {
        let result = self.handle(endpoints::ADD_ITEM, access_token, |backend| {
            if !backend.catalog.contains_key(product_id) {
                return Err(not_found("Product not found"));
            }
            match backend.line_mut(product_id) {
                Some(line) => line.1 += quantity,
                None => backend.lines.push((product_id.clone(), quantity)),
            }
            Ok(ApiAck {
                message: Some("Item added to cart".to_string()),
            })
        });
        async move { result }
    }

    fn increase_item(
        &self,
        access_token: &str,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<ApiAck>> + Send {
        let result = self.handle(endpoints::INCREASE_ITEM, access_token, |backend| {
            let line = backend
                .line_mut(product_id)
                .ok_or_else(|| not_found("Item not in cart"))?;
            line.1 += 1;
            Ok(ApiAck::default())
        });
        async move { result }
    }

    fn decrease_item(
        &self,
        access_token: &str,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<ApiAck>> + Send {
        let result = self.handle(endpoints::DECREASE_ITEM, access_token, |backend| {
            let line = backend
                .line_mut(product_id)
                .ok_or_else(|| not_found("Item not in cart"))?;
            line.1 = line.1.saturating_sub(1);
            backend.lines.retain(|(_, quantity)| *quantity > 0);
            Ok(ApiAck::default())
        });
        async move { result }
    }

    fn set_quantity(
        &self,
        access_token: &str,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<ApiAck>> + Send {
        let result = self.handle(endpoints::SET_QUANTITY, access_token, |backend| {
            if !backend.catalog.contains_key(product_id) {
                return Err(not_found("Product not found"));
            }
            match backend.line_mut(product_id) {
                Some(line) => line.1 = quantity,
                None => backend.lines.push((product_id.clone(), quantity)),
            }
            backend.lines.retain(|(_, quantity)| *quantity > 0);
            Ok(ApiAck::default())
        });
        async move { result }
    }

    fn clear_cart(&self, access_token: &str) -> impl Future<Output = Result<ApiAck>> + Send {
        let result = self.handle(endpoints::CLEAR_CART, access_token, |backend| {
            backend.lines.clear();
            backend.applied = None;
            Ok(ApiAck::default())
        });
        async move { result }
    }

    fn apply_coupon(
        &self,
        access_token: &str,
        code: &str,
    ) -> impl Future<Output = Result<AppliedCoupon>> + Send {
        let result = self.handle(endpoints::APPLY_COUPON, access_token, |backend| {
            let code = code.trim().to_uppercase();
            if !backend.coupons.contains_key(&code) {
                return Err(bad_request("Invalid coupon code"));
            }
            backend.applied = Some(code.clone());
            let discount = backend.discount(backend.total());
            Ok(AppliedCoupon {
                code,
                discount_amount: Some(discount),
            })
        });
        async move { result }
    }

    fn remove_coupon(
        &self,
        access_token: &str,
        code: &str,
    ) -> impl Future<Output = Result<ApiAck>> + Send {
        let result = self.handle(endpoints::REMOVE_COUPON, access_token, |backend| {
            let code = code.trim().to_uppercase();
            if backend.applied.as_deref() != Some(code.as_str()) {
                return Err(bad_request("Coupon is not applied"));
            }
            backend.applied = None;
            Ok(ApiAck::default())
        });
        async move { result }
    }
}

/// Confirmation dialog answering from a script.
///
/// Queued answers are used first, then the default. Every prompt is recorded.
#[derive(Debug, Clone)]
pub struct ScriptedConfirmer {
    default: bool,
    answers: Arc<Mutex<VecDeque<bool>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConfirmer {
    /// Answer `default` unless scripted otherwise.
    #[must_use]
    pub fn new(default: bool) -> Self {
        Self {
            default,
            answers: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always agree.
    #[must_use]
    pub fn accepting() -> Self {
        Self::new(true)
    }

    /// Always decline.
    #[must_use]
    pub fn declining() -> Self {
        Self::new(false)
    }

    /// Use `answer` for the next prompt.
    pub fn push_answer(&self, answer: bool) {
        if let Ok(mut answers) = self.answers.lock() {
            answers.push_back(answer);
        }
    }

    /// Messages shown so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, message: &str) -> bool {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(message.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn backend() -> InMemoryCartBackend {
        InMemoryCartBackend::new()
            .with_product(Product::new(1u64, "Lamp", Decimal::new(500, 0)))
            .with_coupon("save10", Decimal::TEN)
    }

    #[tokio::test]
    async fn test_decrease_at_one_removes_the_line() {
        let backend = backend();
        let id = ProductId::from(1u64);
        backend.add_item("t", &id, 1).await.unwrap();
        backend.decrease_item("t", &id).await.unwrap();

        assert!(backend.lines().is_empty());
        assert!(matches!(
            backend.decrease_item("t", &id).await,
            Err(CartError::Rejected { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_summary_applies_percentage_coupon() {
        let backend = backend();
        backend.seed_line(1u64, 2);
        backend.apply_coupon("t", "save10").await.unwrap();

        let summary = backend.summary("t").await.unwrap();
        assert_eq!(summary.cart_total, Decimal::new(1000, 0));
        assert_eq!(summary.final_amount, Decimal::new(900, 0));
        assert_eq!(summary.applied_coupon.unwrap().code, "SAVE10");
    }

    #[tokio::test]
    async fn test_scripted_failure_fires_once() {
        let backend = backend();
        backend.fail_next(endpoints::CLEAR_CART, CartError::Transport("down".into()));

        assert!(backend.clear_cart("t").await.is_err());
        assert!(backend.clear_cart("t").await.is_ok());
        assert_eq!(backend.request_count(endpoints::CLEAR_CART), 2);
    }

    #[tokio::test]
    async fn test_rejected_token_gets_401() {
        let backend = backend();
        backend.reject_token("stale");
        assert_eq!(
            backend.get_items("stale").await,
            Err(CartError::Unauthorized)
        );
    }

    #[test]
    fn test_confirmer_uses_script_then_default() {
        let confirmer = ScriptedConfirmer::accepting();
        confirmer.push_answer(false);

        assert!(!confirmer.confirm("first"));
        assert!(confirmer.confirm("second"));
        assert_eq!(confirmer.prompts(), vec!["first", "second"]);
    }
}

//! [`CartApi`] over the storefront REST backend.

use crate::api::CartApi;
use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::types::{ApiAck, AppliedCoupon, CartItem, CartSummary};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use std::future::Future;
use storefront_catalog::normalize_list;
use storefront_core::ids::ProductId;

/// Endpoint paths, relative to the base URL.
pub mod endpoints {
    /// `GET` the lines.
    pub const GET_ITEMS: &str = "/cart/get_items/";
    /// `POST {product_id, quantity}`.
    pub const ADD_ITEM: &str = "/cart/add_item/";
    /// `POST {product_id}`.
    pub const INCREASE_ITEM: &str = "/cart/increase_item/";
    /// `POST {product_id}`; decrements, deleting the line at zero.
    pub const REMOVE_ITEM: &str = "/cart/remove_item/";
    /// `POST` to empty the cart.
    pub const CLEAR_CART: &str = "/cart/clear_cart/";
    /// `GET` coupon-aware totals.
    pub const SUMMARY: &str = "/cart/summary/";
    /// `POST {code}`.
    pub const APPLY_COUPON: &str = "/coupon/apply/";
    /// `POST {code}`.
    pub const REMOVE_COUPON: &str = "/coupon/remove/";
}

/// Cart client speaking to the backend with reqwest.
///
/// Sends `Content-Type: application/json`, `X-CSRFToken` and
/// `Authorization: Bearer` on every request. No timeout is set.
#[derive(Debug, Clone)]
pub struct HttpCartApi {
    client: Client,
    config: CartConfig,
}

impl HttpCartApi {
    /// Create a client.
    #[must_use]
    pub fn new(config: CartConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Client configuration.
    #[must_use]
    pub const fn config(&self) -> &CartConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str, access_token: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.url(path))
            .header("Content-Type", "application/json")
            .header("X-CSRFToken", &self.config.csrf_token)
            .bearer_auth(access_token)
    }

    fn get(&self, path: &str, access_token: &str) -> RequestBuilder {
        self.request(Method::GET, path, access_token)
    }

    fn post<B: Serialize>(&self, path: &str, access_token: &str, body: &B) -> RequestBuilder {
        self.request(Method::POST, path, access_token).json(body)
    }
}

/// Send and read the body, mapping failures onto [`CartError`].
async fn send(request: RequestBuilder) -> Result<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| CartError::Transport(e.to_string()))?;

    let status = response.status();
    tracing::debug!(url = %response.url(), status = status.as_u16(), "Cart response");

    if status == StatusCode::UNAUTHORIZED {
        return Err(CartError::Unauthorized);
    }

    let text = response
        .text()
        .await
        .map_err(|e| CartError::Transport(e.to_string()))?;
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                CartError::MalformedResponse(e.to_string())
            } else {
                CartError::Rejected {
                    status: status.as_u16(),
                    message: Some(text.clone()),
                }
            }
        })?
    };

    let refused = body.get("success").and_then(Value::as_bool) == Some(false);
    if !status.is_success() || refused {
        return Err(CartError::Rejected {
            status: status.as_u16(),
            message: message_of(&body),
        });
    }

    Ok(body)
}

fn message_of(body: &Value) -> Option<String> {
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn ack(body: &Value) -> ApiAck {
    ApiAck {
        message: message_of(body),
    }
}

impl CartApi for HttpCartApi {
    fn get_items(&self, access_token: &str) -> impl Future<Output = Result<Vec<CartItem>>> + Send {
        let request = self.get(endpoints::GET_ITEMS, access_token);
        async move {
            let body = send(request).await?;
            let items: Vec<CartItem> = normalize_list(body).into_items_or_empty("cart items");
            Ok(items
                .into_iter()
                .filter(|item| {
                    if item.quantity == 0 {
                        tracing::warn!(product_id = %item.product.id, "Ignoring zero-quantity line");
                    }
                    item.quantity > 0
                })
                .collect())
        }
    }

    fn summary(&self, access_token: &str) -> impl Future<Output = Result<CartSummary>> + Send {
        let request = self.get(endpoints::SUMMARY, access_token);
        async move {
            let mut body = send(request).await?;
            let data = body
                .get_mut("data")
                .map(Value::take)
                .ok_or_else(|| CartError::MalformedResponse("summary has no data".into()))?;
            serde_json::from_value(data).map_err(|e| CartError::MalformedResponse(e.to_string()))
        }
    }

    fn add_item(
        &self,
        access_token: &str,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<ApiAck>> + Send {
        let body = json!({ "product_id": product_id, "quantity": quantity });
        let request = self.post(endpoints::ADD_ITEM, access_token, &body);
        async move { Ok(ack(&send(request).await?)) }
    }

    fn increase_item(
        &self,
        access_token: &str,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<ApiAck>> + Send {
        let body = json!({ "product_id": product_id });
        let request = self.post(endpoints::INCREASE_ITEM, access_token, &body);
        async move { Ok(ack(&send(request).await?)) }
    }

    fn decrease_item(
        &self,
        access_token: &str,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<ApiAck>> + Send {
        let body = json!({ "product_id": product_id });
        let request = self.post(endpoints::REMOVE_ITEM, access_token, &body);
        async move { Ok(ack(&send(request).await?)) }
    }

    fn set_quantity(
        &self,
        access_token: &str,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<ApiAck>> + Send {
        let body = json!({ "product_id": product_id, "quantity": quantity });
        let request = self.post(&self.config.set_quantity_path, access_token, &body);
        async move { Ok(ack(&send(request).await?)) }
    }

    fn clear_cart(&self, access_token: &str) -> impl Future<Output = Result<ApiAck>> + Send {
        let request = self.post(endpoints::CLEAR_CART, access_token, &json!({}));
        async move { Ok(ack(&send(request).await?)) }
    }

    fn apply_coupon(
        &self,
        access_token: &str,
        code: &str,
    ) -> impl Future<Output = Result<AppliedCoupon>> + Send {
        let request = self.post(endpoints::APPLY_COUPON, access_token, &json!({ "code": code }));
        let requested = code.to_string();
        async move {
            let mut body = send(request).await?;
            let data = body.get_mut("data").map(Value::take).unwrap_or(Value::Null);
            if data.is_null() {
                // accepted, just without details
                tracing::debug!(code = %requested, "Coupon applied without a data object");
                return Ok(AppliedCoupon {
                    code: requested,
                    discount_amount: None,
                });
            }
            serde_json::from_value(data).map_err(|e| CartError::MalformedResponse(e.to_string()))
        }
    }

    fn remove_coupon(
        &self,
        access_token: &str,
        code: &str,
    ) -> impl Future<Output = Result<ApiAck>> + Send {
        let request = self.post(endpoints::REMOVE_COUPON, access_token, &json!({ "code": code }));
        async move { Ok(ack(&send(request).await?)) }
    }
}

//! `HttpCartApi` against a mock backend.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use serde_json::json;
use storefront_cart::http::endpoints;
use storefront_cart::{
    CartApi, CartConfig, CartError, CartMutation, HttpCartApi, QuantityUpdate, perform,
};
use storefront_core::ids::ProductId;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "guest_access_abc";

fn api(server: &MockServer) -> HttpCartApi {
    HttpCartApi::new(CartConfig::new(server.uri(), "csrf-abc"))
}

fn line(id: u64, price: &str, quantity: u32) -> serde_json::Value {
    json!({
        "product": { "id": id, "name": format!("Product {id}"), "price": price },
        "quantity": quantity
    })
}

#[tokio::test]
async fn test_requests_carry_csrf_and_bearer_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::GET_ITEMS))
        .and(header("X-CSRFToken", "csrf-abc"))
        .and(header("Authorization", "Bearer guest_access_abc"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [line(1, "500.00", 2)] })))
        .expect(1)
        .mount(&server)
        .await;

    let items = api(&server).get_items(TOKEN).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].product.price, Decimal::new(500, 0));
}

#[tokio::test]
async fn test_items_accept_every_envelope_and_skip_empty_lines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::GET_ITEMS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [line(1, "10", 1), line(2, "20", 0)]
        })))
        .mount(&server)
        .await;

    let items = api(&server).get_items(TOKEN).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product.id, ProductId::from(1u64));
}

#[tokio::test]
async fn test_unrecognized_items_body_reads_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::GET_ITEMS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cart": "?" })))
        .mount(&server)
        .await;

    assert!(api(&server).get_items(TOKEN).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_status_401_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::INCREASE_ITEM))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .mount(&server)
        .await;

    let result = api(&server)
        .increase_item(TOKEN, &ProductId::from("1"))
        .await;

    assert_eq!(result, Err(CartError::Unauthorized));
}

#[tokio::test]
async fn test_success_false_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::CLEAR_CART))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "Cart is locked" })),
        )
        .mount(&server)
        .await;

    let error = api(&server).clear_cart(TOKEN).await.unwrap_err();

    assert_eq!(error.server_message(), Some("Cart is locked"));
}

#[tokio::test]
async fn test_coupon_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::APPLY_COUPON))
        .and(body_json(json!({ "code": "BOGUS" })))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Invalid coupon code" })),
        )
        .mount(&server)
        .await;

    let error = api(&server).apply_coupon(TOKEN, "BOGUS").await.unwrap_err();

    assert_eq!(
        error,
        CartError::Rejected {
            status: 400,
            message: Some("Invalid coupon code".into()),
        }
    );
}

#[tokio::test]
async fn test_applied_coupon_is_read_from_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::APPLY_COUPON))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "code": "SAVE10", "discount_amount": "100.00" }
        })))
        .mount(&server)
        .await;

    let coupon = api(&server).apply_coupon(TOKEN, "SAVE10").await.unwrap();

    assert_eq!(coupon.code, "SAVE10");
    assert_eq!(coupon.discount_amount, Some(Decimal::new(100, 0)));
}

#[tokio::test]
async fn test_applied_coupon_without_data_keeps_requested_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::APPLY_COUPON))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "Coupon applied" })),
        )
        .mount(&server)
        .await;

    let coupon = api(&server).apply_coupon(TOKEN, "SAVE10").await.unwrap();

    assert_eq!(coupon.code, "SAVE10");
    assert_eq!(coupon.discount_amount, None);
}

#[tokio::test]
async fn test_removal_of_a_line_gone_from_the_server_sends_no_decrement() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::GET_ITEMS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [line(1, "10", 2)] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(endpoints::REMOVE_ITEM))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let mutation = CartMutation::Remove {
        product_id: ProductId::from("9"),
    };
    perform(&api(&server), TOKEN, &mutation, QuantityUpdate::RemoveThenAdd)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_summary_reads_data_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::SUMMARY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "cart_total": "1000.00",
                "discount_amount": "100.00",
                "final_amount": "900.00",
                "applied_coupon": { "code": "SAVE10" }
            }
        })))
        .mount(&server)
        .await;

    let summary = api(&server).summary(TOKEN).await.unwrap();

    assert_eq!(summary.final_amount, Decimal::new(900, 0));
    assert_eq!(summary.applied_coupon.unwrap().code, "SAVE10");
}

#[tokio::test]
async fn test_summary_without_data_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::SUMMARY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    assert!(matches!(
        api(&server).summary(TOKEN).await,
        Err(CartError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_add_item_posts_product_and_quantity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::ADD_ITEM))
        .and(body_json(json!({ "product_id": "42", "quantity": 2 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "Item added" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ack = api(&server)
        .add_item(TOKEN, &ProductId::from(42u64), 2)
        .await
        .unwrap();

    assert_eq!(ack.message.as_deref(), Some("Item added"));
}

#[tokio::test]
async fn test_two_step_update_decrements_then_adds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::GET_ITEMS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([line(7, "10", 3)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(endpoints::REMOVE_ITEM))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(endpoints::ADD_ITEM))
        .and(body_json(json!({ "product_id": "7", "quantity": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let mutation = CartMutation::UpdateQuantity {
        product_id: ProductId::from("7"),
        quantity: 5,
    };
    perform(&api(&server), TOKEN, &mutation, QuantityUpdate::RemoveThenAdd)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_set_quantity_uses_configured_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cart/quantity/"))
        .and(body_json(json!({ "product_id": "7", "quantity": 5 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpCartApi::new(
        CartConfig::new(server.uri(), "csrf-abc").with_set_quantity_path("/api/cart/quantity/"),
    );
    let ack = api
        .set_quantity(TOKEN, &ProductId::from("7"), 5)
        .await
        .unwrap();

    assert_eq!(ack.message, None);
}

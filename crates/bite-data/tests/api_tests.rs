//! Endpoint wiring against a scripted backend.

use bite_commerce::ids::{ItemId, OrderId, RestaurantId};
use bite_data::api::{CartAddRequest, Credentials, OrderStatus};
use bite_data::{BiteApi, FetchClient, FetchError, Method, ScriptedTransport};
use futures::executor::block_on;
use serde_json::json;
use std::rc::Rc;

const BASE: &str = "http://127.0.0.1:5000/api";

fn api() -> (BiteApi, Rc<ScriptedTransport>) {
    let transport = Rc::new(ScriptedTransport::new());
    let api = BiteApi::new(FetchClient::new(BASE, transport.clone()));
    (api, transport)
}

#[test]
fn test_restaurant_and_menu() {
    let (api, transport) = api();
    transport
        .reply(
            200,
            json!({"id": "r1", "name": "Spice Route", "cuisine": "North Indian",
                   "rating": 4.4, "delivery_time": "30 min", "image_url": "/img/r1.jpg"}),
        )
        .reply(
            200,
            json!([{"id": "m1", "restaurant_id": "r1", "name": "Dal Makhani",
                    "price": 180, "type": "veg"}]),
        );

    let id = RestaurantId::new("r1");
    let restaurant = block_on(api.restaurant(&id)).unwrap();
    let menu = block_on(api.menu(&id)).unwrap();

    assert_eq!(restaurant.name, "Spice Route");
    assert_eq!(menu.len(), 1);

    let sent = transport.sent();
    assert_eq!(sent[0].url, format!("{}/restaurants/r1", BASE));
    assert_eq!(sent[1].url, format!("{}/restaurants/r1/menu", BASE));
    assert!(sent.iter().all(|r| r.method == Method::Get));
}

#[test]
fn test_not_found_carries_server_message() {
    let (api, transport) = api();
    transport.reply(404, json!({"message": "Restaurant not found"}));

    let err = block_on(api.restaurant(&RestaurantId::new("nope"))).unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Restaurant not found");
}

#[test]
fn test_network_failure() {
    let (api, transport) = api();
    transport.fail("connection refused");

    let err = block_on(api.restaurants()).unwrap_err();
    assert!(matches!(err, FetchError::RequestError(_)));
    assert_eq!(transport.sent().len(), 1);
}

#[test]
fn test_login_posts_credentials() {
    let (api, transport) = api();
    transport.reply(
        200,
        json!({"message": "Login successful", "user": {"email": "asha@example.com"}}),
    );

    let response = block_on(api.login(&Credentials {
        email: "asha@example.com".into(),
        password: "secret".into(),
    }))
    .unwrap();

    assert_eq!(response.message, "Login successful");
    let sent = &transport.sent()[0];
    assert_eq!(sent.method, Method::Post);
    let body: serde_json::Value = sent.json_body().unwrap().unwrap();
    assert_eq!(body["email"], "asha@example.com");
}

#[test]
fn test_anonymous_user() {
    let (api, transport) = api();
    transport.reply(401, json!({"message": "Not authenticated"}));
    assert_eq!(block_on(api.current_user()).unwrap(), None);
}

#[test]
fn test_server_cart_round() {
    let (api, transport) = api();
    transport
        .reply(
            200,
            json!({"message": "Item added to cart",
                   "cart": {"items": [{"id": "m1", "name": "Dal", "price": 180, "quantity": 1}],
                            "total": 180}}),
        )
        .reply(
            200,
            json!({"message": "Item removed", "cart": {"items": [], "total": 0}}),
        );

    let added = block_on(api.add_to_cart(&CartAddRequest {
        id: ItemId::new("m1"),
        name: "Dal".into(),
        price: bite_commerce::Money::new(18000),
        restaurant_id: None,
    }))
    .unwrap();
    assert_eq!(added.cart.items.len(), 1);

    let removed = block_on(api.remove_cart_item(&ItemId::new("m1"))).unwrap();
    assert!(removed.cart.items.is_empty());

    let sent = transport.sent();
    assert_eq!(sent[1].method, Method::Delete);
    assert_eq!(sent[1].url, format!("{}/cart/remove/m1", BASE));
}

#[test]
fn test_order_lookup() {
    let (api, transport) = api();
    transport.reply(
        200,
        json!({"id": 42, "items": [], "total_amount": 350.0,
               "delivery_address": "12 MG Road", "status": "preparing"}),
    );

    let order = block_on(api.order(&OrderId::new("42"))).unwrap();
    assert_eq!(order.id.as_str(), "42");
    assert_eq!(order.status, OrderStatus::Preparing);
}

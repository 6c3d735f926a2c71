//! The checkout behaviors that are deliberate gaps, kept as they are and
//! pinned by tests: the size is not revalidated against the product's size
//! list, and the profile address write is independent of the order insert.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::Ordering;

use hoodies_core::Role;
use hoodies_integration_tests::{TestApp, location};

#[tokio::test]
async fn checkout_accepts_a_size_outside_the_product_list() {
    let app = TestApp::spawn().await;
    app.backend
        .add_account("shopper@example.com", "hunter2", "Sam Shopper", Role::Customer);
    let product = app
        .backend
        .add_product("Midnight Hoodie", "59.95".parse().unwrap(), &["S", "M", "L"]);

    let client = app.client();
    app.sign_in(&client, "shopper@example.com", "hunter2").await;

    // "XXL" is not in the product's size list; checkout takes it anyway
    let response = client
        .post(app.url("/checkout"))
        .form(&[
            ("product", product.to_string().as_str()),
            ("size", "XXL"),
            ("address", "1 Main St"),
            ("city", "Portland"),
            ("state", "OR"),
            ("postal_code", "97201"),
            ("country", "USA"),
        ])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/dashboard");

    let orders = app.backend.stored_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].size, "XXL");
}

#[tokio::test]
async fn profile_address_is_updated_even_when_the_order_insert_fails() {
    let app = TestApp::spawn().await;
    let user = app
        .backend
        .add_account("shopper@example.com", "hunter2", "Sam Shopper", Role::Customer);
    let product = app
        .backend
        .add_product("Midnight Hoodie", "59.95".parse().unwrap(), &["S", "M"]);

    app.backend.fail_order_inserts.store(true, Ordering::Relaxed);

    let client = app.client();
    app.sign_in(&client, "shopper@example.com", "hunter2").await;

    let response = client
        .post(app.url("/checkout"))
        .form(&[
            ("product", product.to_string().as_str()),
            ("size", "M"),
            ("address", "9 Elm Ave"),
            ("city", "Salem"),
            ("state", "OR"),
            ("postal_code", "97301"),
            ("country", "USA"),
        ])
        .send()
        .await
        .unwrap();

    // The page re-renders with the backend's message; the user stays put
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("order insert rejected"));
    // The form is still populated for a retry
    assert!(body.contains("9 Elm Ave"));

    // No order exists, but the profile write from step 1 persists
    assert!(app.backend.stored_orders().is_empty());
    let profile = app.backend.stored_profile(user).unwrap();
    assert_eq!(profile.address.as_deref(), Some("9 Elm Ave"));
    assert_eq!(profile.city.as_deref(), Some("Salem"));
}

#[tokio::test]
async fn checkout_rejects_an_incomplete_address_without_writing() {
    let app = TestApp::spawn().await;
    let user = app
        .backend
        .add_account("shopper@example.com", "hunter2", "Sam Shopper", Role::Customer);
    let product = app
        .backend
        .add_product("Midnight Hoodie", "59.95".parse().unwrap(), &["S", "M"]);

    let client = app.client();
    app.sign_in(&client, "shopper@example.com", "hunter2").await;

    let response = client
        .post(app.url("/checkout"))
        .form(&[
            ("product", product.to_string().as_str()),
            ("size", "M"),
            ("address", "1 Main St"),
            ("city", ""),
            ("state", "OR"),
            ("postal_code", "97201"),
            ("country", "USA"),
        ])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("City is required"));

    // Validation failed before either write was attempted
    assert_eq!(app.backend.order_inserts.load(Ordering::Relaxed), 0);
    let profile = app.backend.stored_profile(user).unwrap();
    assert_eq!(profile.address, None);
}

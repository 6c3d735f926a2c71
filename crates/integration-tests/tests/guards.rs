//! Route guard tests.
//!
//! Gated pages redirect silently: dashboard and checkout to sign-in, admin
//! pages to home. Admin redirects must happen before any admin data is
//! read from the backend.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::Ordering;

use hoodies_core::Role;
use hoodies_integration_tests::{TestApp, location};

#[tokio::test]
async fn anonymous_dashboard_redirects_to_sign_in() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let response = client.get(app.url("/dashboard")).send().await.unwrap();

    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/auth"));
}

#[tokio::test]
async fn anonymous_checkout_redirects_to_sign_in() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let response = client
        .get(app.url("/checkout?product=1&size=M"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/auth"));
}

#[tokio::test]
async fn anonymous_admin_redirects_home() {
    let app = TestApp::spawn().await;
    let client = app.client();

    for path in ["/admin", "/admin/products", "/admin/orders"] {
        let response = client.get(app.url(path)).send().await.unwrap();
        assert!(response.status().is_redirection(), "{path} did not redirect");
        assert_eq!(location(&response), "/", "{path} redirected elsewhere");
    }

    assert_eq!(app.backend.all_order_reads.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn customer_admin_redirects_home_before_order_read() {
    let app = TestApp::spawn().await;
    app.backend
        .add_account("shopper@example.com", "hunter2", "Sam Shopper", Role::Customer);

    let client = app.client();
    app.sign_in(&client, "shopper@example.com", "hunter2").await;

    let response = client.get(app.url("/admin/orders")).send().await.unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
    // The guard rejected before the order list was ever fetched
    assert_eq!(app.backend.all_order_reads.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn admin_role_check_fails_closed_on_lookup_error() {
    let app = TestApp::spawn().await;
    app.backend
        .add_account("admin@example.com", "hunter2", "Avery Admin", Role::Admin);

    let client = app.client();
    app.sign_in(&client, "admin@example.com", "hunter2").await;

    // Admin access works while the profile lookup works
    let response = client.get(app.url("/admin")).send().await.unwrap();
    assert!(response.status().is_success());

    // Once lookups fail, the same session is denied rather than erroring
    app.backend.fail_profile_reads.store(true, Ordering::Relaxed);
    let response = client.get(app.url("/admin")).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn admin_pages_render_for_admins() {
    let app = TestApp::spawn().await;
    app.backend
        .add_account("admin@example.com", "hunter2", "Avery Admin", Role::Admin);

    let client = app.client();
    app.sign_in(&client, "admin@example.com", "hunter2").await;

    for path in ["/admin", "/admin/products", "/admin/orders"] {
        let response = client.get(app.url(path)).send().await.unwrap();
        assert!(response.status().is_success(), "{path} did not render");
    }
}

#[tokio::test]
async fn public_pages_render_for_everyone() {
    let app = TestApp::spawn().await;
    let client = app.client();

    for path in ["/", "/shop", "/auth", "/health"] {
        let response = client.get(app.url(path)).send().await.unwrap();
        assert!(response.status().is_success(), "{path} did not render");
    }
}

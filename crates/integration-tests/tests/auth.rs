//! Authentication flow tests.

#![allow(clippy::unwrap_used)]

use hoodies_core::Role;
use hoodies_integration_tests::{TestApp, location};

#[tokio::test]
async fn sign_in_with_bad_credentials_shows_the_backend_message() {
    let app = TestApp::spawn().await;
    app.backend
        .add_account("shopper@example.com", "hunter2", "Sam Shopper", Role::Customer);

    let client = app.client();
    let response = client
        .post(app.url("/auth/signin"))
        .form(&[("email", "shopper@example.com"), ("password", "wrong")])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    let redirect = location(&response);
    assert!(redirect.starts_with("/auth?error="));

    // Following the redirect renders the message
    let response = client.get(app.url(&redirect)).send().await.unwrap();
    assert!(response.status().is_success());
    assert!(
        response
            .text()
            .await
            .unwrap()
            .contains("Invalid login credentials")
    );
}

#[tokio::test]
async fn sign_up_establishes_a_session() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let response = client
        .post(app.url("/auth/signup"))
        .form(&[
            ("full_name", "New Customer"),
            ("email", "new@example.com"),
            ("password", "hunter2"),
        ])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/dashboard");

    // The session cookie works for gated pages
    let response = client.get(app.url("/dashboard")).send().await.unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn duplicate_sign_up_is_rejected() {
    let app = TestApp::spawn().await;
    app.backend
        .add_account("taken@example.com", "hunter2", "First", Role::Customer);

    let client = app.client();
    let response = client
        .post(app.url("/auth/signup"))
        .form(&[
            ("full_name", "Second"),
            ("email", "taken@example.com"),
            ("password", "hunter2"),
        ])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/auth?error="));
}

#[tokio::test]
async fn sign_out_ends_the_session() {
    let app = TestApp::spawn().await;
    app.backend
        .add_account("shopper@example.com", "hunter2", "Sam Shopper", Role::Customer);

    let client = app.client();
    app.sign_in(&client, "shopper@example.com", "hunter2").await;

    let response = client.post(app.url("/auth/signout")).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");

    // Gated pages redirect again
    let response = client.get(app.url("/dashboard")).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/auth"));
}

#[tokio::test]
async fn signed_in_users_skip_the_auth_page() {
    let app = TestApp::spawn().await;
    app.backend
        .add_account("shopper@example.com", "hunter2", "Sam Shopper", Role::Customer);

    let client = app.client();
    app.sign_in(&client, "shopper@example.com", "hunter2").await;

    let response = client.get(app.url("/auth")).send().await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn admin_link_appears_only_for_admins() {
    let app = TestApp::spawn().await;
    app.backend
        .add_account("admin@example.com", "hunter2", "Avery Admin", Role::Admin);
    app.backend
        .add_account("shopper@example.com", "hunter2", "Sam Shopper", Role::Customer);

    let admin = app.client();
    app.sign_in(&admin, "admin@example.com", "hunter2").await;
    let body = admin
        .get(app.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("href=\"/admin\""));

    let shopper = app.client();
    app.sign_in(&shopper, "shopper@example.com", "hunter2").await;
    let body = shopper
        .get(app.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("href=\"/admin\""));
    assert!(body.contains("href=\"/dashboard\""));
}

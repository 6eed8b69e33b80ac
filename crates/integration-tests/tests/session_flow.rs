//! Login, restart, and logout against a mock backend with a file-backed session.

#![allow(clippy::unwrap_used)]

use relab_core::{Email, UserId};
use relab_integration_tests::{TestContext, cart_json, user_json};
use relab_storefront::views::{AuthPanel, CartPanel, LoginForm};
use secrecy::ExposeSecret;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_login(ctx: &TestContext, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/v1/usuarios/auth/login/"))
        .and(body_json(json!({"email": "maria@relab.com.br", "password": "s3nha"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&ctx.server)
        .await;
}

#[tokio::test]
async fn test_login_persists_token_and_user() {
    let ctx = TestContext::new().await;
    mount_login(
        &ctx,
        json!({"access": "acc-1", "refresh": "ref-1", "user": user_json()}),
    )
    .await;

    let email = Email::parse("maria@relab.com.br").unwrap();
    ctx.session.login(&ctx.client, &email, "s3nha").await.unwrap();

    let stored = ctx.session_file_json();
    assert_eq!(stored["access_token"], "acc-1");
    assert_eq!(stored["refresh_token"], "ref-1");

    // A new process sees the same session.
    let ctx = ctx.reopen();
    assert!(ctx.session.is_authenticated());
    assert_eq!(ctx.session.access_token().unwrap().expose_secret(), "acc-1");
    assert_eq!(ctx.session.user().unwrap().id, UserId::new(9));
}

#[tokio::test]
async fn test_login_without_user_keeps_stored_profile() {
    let ctx = TestContext::new().await;
    ctx.store()
        .save(
            &secrecy::SecretString::from("old".to_string()),
            "old-ref",
            Some(&serde_json::from_value(user_json()).unwrap()),
        )
        .unwrap();
    let ctx = ctx.reopen();
    mount_login(&ctx, json!({"access": "new", "refresh": "new-ref"})).await;

    let email = Email::parse("maria@relab.com.br").unwrap();
    let user = ctx.session.login(&ctx.client, &email, "s3nha").await.unwrap();

    assert_eq!(user.unwrap().username, "maria");
    assert_eq!(ctx.store().get_token().unwrap().expose_secret(), "new");
    assert_eq!(ctx.store().get_user().unwrap().username, "maria");
}

#[tokio::test]
async fn test_login_then_cart_uses_new_token() {
    let ctx = TestContext::new().await;
    mount_login(
        &ctx,
        json!({"access": "acc-1", "refresh": "ref-1", "user": user_json()}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/carrinho/"))
        .and(header("authorization", "Bearer acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[(15, 2, 4990)])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let mut auth = AuthPanel::new(ctx.client.clone(), ctx.session.clone());
    let mut cart = CartPanel::new(ctx.client.clone(), ctx.session.clone());
    auth.login = LoginForm {
        email: "maria@relab.com.br".to_string(),
        password: "s3nha".to_string(),
    };

    auth.submit_login(&mut cart).await.unwrap();

    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.cart().unwrap().display_total().to_string(), "R$ 99.80");
}

#[tokio::test]
async fn test_logout_clears_all_keys_without_network() {
    let ctx = TestContext::new().await;
    mount_login(
        &ctx,
        json!({"access": "acc-1", "refresh": "ref-1", "user": user_json()}),
    )
    .await;
    let email = Email::parse("maria@relab.com.br").unwrap();
    ctx.session.login(&ctx.client, &email, "s3nha").await.unwrap();
    let requests_before = ctx.request_count().await;

    ctx.session.logout().unwrap();

    assert_eq!(ctx.request_count().await, requests_before);
    let stored = ctx.session_file_json();
    assert!(stored.get("access_token").is_none());
    assert!(stored.get("refresh_token").is_none());
    assert!(stored.get("user_data").is_none());
    assert!(!ctx.reopen().session.is_authenticated());
}

#[tokio::test]
async fn test_logout_when_anonymous() {
    let ctx = TestContext::new().await;
    ctx.session.logout().unwrap();
    assert!(!ctx.session.is_authenticated());
    assert_eq!(ctx.request_count().await, 0);
}

#[tokio::test]
async fn test_rejected_credentials_leave_no_session() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/usuarios/auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            json!({"detail": "No active account found with the given credentials"}),
        ))
        .mount(&ctx.server)
        .await;

    let mut auth = AuthPanel::new(ctx.client.clone(), ctx.session.clone());
    let mut cart = CartPanel::new(ctx.client.clone(), ctx.session.clone());
    auth.login = LoginForm {
        email: "maria@relab.com.br".to_string(),
        password: "errada".to_string(),
    };

    assert!(auth.submit_login(&mut cart).await.is_err());
    assert_eq!(
        auth.error(),
        Some("No active account found with the given credentials")
    );
    assert!(ctx.store().get_token().is_none());
    assert!(cart.cart().is_none());
}

//! Registration through the auth panel.

#![allow(clippy::unwrap_used)]

use relab_integration_tests::{TestContext, user_json};
use relab_storefront::AppError;
use relab_storefront::views::{AuthMode, AuthPanel, FormError, RegisterForm};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn form() -> RegisterForm {
    let mut form = RegisterForm::default();
    form.username = "maria".to_string();
    form.email = "maria@relab.com.br".to_string();
    form.first_name = "Maria".to_string();
    form.last_name = "Souza".to_string();
    form.password = "s3nha-forte".to_string();
    form.password_confirm = "s3nha-forte".to_string();
    form.set_cpf("123.456.789-09");
    form.set_phone("(11) 98765-4321");
    form
}

fn register_panel(ctx: &TestContext, form: RegisterForm) -> AuthPanel {
    let mut panel = AuthPanel::new(ctx.client.clone(), ctx.session.clone());
    panel.switch_mode(AuthMode::Register);
    panel.register = form;
    panel
}

#[tokio::test]
async fn test_password_mismatch_never_reaches_backend() {
    let ctx = TestContext::new().await;
    let mut bad = form();
    bad.password_confirm = "s3nha-fraca".to_string();
    let mut panel = register_panel(&ctx, bad);

    let err = panel.submit_register().await.unwrap_err();

    assert!(matches!(err, AppError::Form(FormError::PasswordMismatch)));
    assert_eq!(panel.error(), Some("As senhas não coincidem!"));
    assert_eq!(ctx.request_count().await, 0);
}

#[tokio::test]
async fn test_registration_sends_normalized_digits() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/usuarios/"))
        .and(body_json(json!({
            "username": "maria",
            "email": "maria@relab.com.br",
            "password": "s3nha-forte",
            "password_confirm": "s3nha-forte",
            "first_name": "Maria",
            "last_name": "Souza",
            "cpf": "12345678909",
            "telefone": "11987654321"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_json()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let mut panel = register_panel(&ctx, form());
    let user = panel.submit_register().await.unwrap();

    assert_eq!(user.username, "maria");
    assert_eq!(panel.mode(), AuthMode::Login);
    assert!(panel.register.password.is_empty());
    assert!(panel.register.password_confirm.is_empty());
    assert!(panel.error().is_none());
    // Registering does not log in.
    assert!(!ctx.session.is_authenticated());
}

#[tokio::test]
async fn test_field_errors_one_line_per_field() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/usuarios/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "email": ["already exists"],
            "cpf": ["invalid"],
            "password": ["too short", "too common"]
        })))
        .mount(&ctx.server)
        .await;

    let mut panel = register_panel(&ctx, form());
    let err = panel.submit_register().await.unwrap_err();

    assert_eq!(err.to_string(), panel.error().unwrap());
    let lines: Vec<&str> = panel.error().unwrap().lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&"email: already exists"));
    assert!(lines.contains(&"cpf: invalid"));
    assert!(lines.contains(&"password: too short, too common"));
    assert_eq!(panel.mode(), AuthMode::Register);
}

#[tokio::test]
async fn test_switching_mode_clears_error() {
    let ctx = TestContext::new().await;
    let mut bad = form();
    bad.password_confirm = "outra".to_string();
    let mut panel = register_panel(&ctx, bad);

    assert!(panel.submit_register().await.is_err());
    assert!(panel.error().is_some());

    panel.switch_mode(AuthMode::Login);
    assert!(panel.error().is_none());
}

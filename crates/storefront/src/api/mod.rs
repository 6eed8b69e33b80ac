//! REST client for the storefront backend.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per process, cheap to clone (shared `reqwest` pool)
//! - Operations are grouped by resource: [`ApiClient::auth`],
//!   [`ApiClient::products`], [`ApiClient::categories`], [`ApiClient::cart`]
//! - Every call is a single request/response round trip; nothing is retried
//! - Catalog reads can go through a `moka` cache (disabled by default)
//! - Logout is local only and lives on the session context
//!
//! # Example
//!
//! ```rust,ignore
//! use relab_storefront::api::{ApiClient, ProductQuery};
//!
//! let client = ApiClient::new(config.api.clone())?;
//!
//! let tokens = client.auth().login(&email, "s3nha").await?;
//! let products = client
//!     .products()
//!     .list(&ProductQuery::new().category(CategoryId::new(2)))
//!     .await?;
//! let cart = client.cart().add(&token, products[0].id, 1).await?;
//! ```

mod auth;
mod cache;
mod cart;
mod catalog;
mod client;

pub use auth::AuthApi;
pub use cart::CartApi;
pub use catalog::{CategoriesApi, ProductQuery, ProductsApi};
pub use client::ApiClient;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response (connection, TLS, timeout).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    ///
    /// `message` is built from the response body and is meant to be shown
    /// to the user as-is.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A success response whose body is not the expected JSON.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A resource path could not be joined onto the base URL.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status of an [`ApiError::Api`] failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend rejected the access token (or it is missing).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }
}

/// How an error body is turned into a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorFormat {
    /// `detail` (or `erro`) when present, otherwise the body itself.
    Detail,
    /// `detail` when present, otherwise one `field: messages` line per field.
    FieldErrors,
}

/// Build the user-facing message for a failed response.
pub(crate) fn error_message(status: StatusCode, body: &str, format: ErrorFormat) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {status}");
    }

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.chars().take(200).collect();
    };

    if let Some(detail) = value.get("detail").and_then(Value::as_str) {
        return detail.to_owned();
    }

    match (format, &value) {
        (ErrorFormat::FieldErrors, Value::Object(fields)) => fields
            .iter()
            .map(|(field, messages)| format!("{field}: {}", join_messages(messages)))
            .collect::<Vec<_>>()
            .join("\n"),
        (ErrorFormat::FieldErrors, Value::Array(_)) => join_messages(&value),
        _ => value
            .get("erro")
            .and_then(Value::as_str)
            .map_or_else(|| value.to_string(), ToOwned::to_owned),
    }
}

/// Flatten a validation value: arrays are joined with `", "`, strings are
/// used verbatim, anything else is rendered as JSON.
fn join_messages(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(join_messages)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_wins() {
        let msg = error_message(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "No active account found with the given credentials"}"#,
            ErrorFormat::Detail,
        );
        assert_eq!(msg, "No active account found with the given credentials");
    }

    #[test]
    fn test_registration_field_errors_one_line_per_field() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"email": ["already exists"], "cpf": ["invalid"]}"#,
            ErrorFormat::FieldErrors,
        );
        let lines: Vec<&str> = msg.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.contains(&"email: already exists"));
        assert!(lines.contains(&"cpf: invalid"));
    }

    #[test]
    fn test_multiple_messages_for_one_field() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"password": ["too short", "too common"]}"#,
            ErrorFormat::FieldErrors,
        );
        assert_eq!(msg, "password: too short, too common");
    }

    #[test]
    fn test_plain_string_field_message() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"password_confirm": "As senhas não coincidem."}"#,
            ErrorFormat::FieldErrors,
        );
        assert_eq!(msg, "password_confirm: As senhas não coincidem.");
    }

    #[test]
    fn test_cart_erro_field() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"erro": "Estoque insuficiente. Disponível: 2"}"#,
            ErrorFormat::Detail,
        );
        assert_eq!(msg, "Estoque insuficiente. Disponível: 2");
    }

    #[test]
    fn test_detail_format_falls_back_to_json() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"quantidade": ["Ensure this value is less than or equal to 99."]}"#,
            ErrorFormat::Detail,
        );
        assert_eq!(
            msg,
            r#"{"quantidade":["Ensure this value is less than or equal to 99."]}"#
        );
    }

    #[test]
    fn test_empty_and_non_json_bodies() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "", ErrorFormat::Detail),
            "HTTP 502 Bad Gateway"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<h1>Server Error</h1>", ErrorFormat::Detail),
            "<h1>Server Error</h1>"
        );
    }

    #[test]
    fn test_status_helpers() {
        let err = ApiError::Api {
            status: 401,
            message: "Given token not valid for any token type".to_string(),
        };
        assert!(err.is_unauthorized());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Given token not valid for any token type");
    }
}

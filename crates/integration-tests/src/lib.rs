//! End-to-end tests for the Relab storefront client.
//!
//! Every test runs against a `wiremock` server standing in for the backend,
//! with the session persisted to a file in a temporary directory, so no
//! external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p relab-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::time::Duration;

use relab_storefront::api::ApiClient;
use relab_storefront::config::ApiConfig;
use relab_storefront::session::{SessionContext, SessionStore};
use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use wiremock::MockServer;

/// Mock backend plus a client and session wired to it.
pub struct TestContext {
    pub server: MockServer,
    pub client: ApiClient,
    pub session: SessionContext,
    session_dir: TempDir,
}

impl TestContext {
    /// Anonymous session, catalog cache disabled.
    pub async fn new() -> Self {
        Self::with_cache_ttl(Duration::ZERO).await
    }

    pub async fn with_cache_ttl(ttl: Duration) -> Self {
        let server = MockServer::start().await;
        let base = Url::parse(&format!("{}/api/v1", server.uri())).unwrap();
        let mut config = ApiConfig::with_base_url(base);
        config.catalog_cache_ttl = ttl;
        let client = ApiClient::new(config).unwrap();

        let session_dir = TempDir::new().unwrap();
        let session = SessionContext::restore(SessionStore::file(
            session_dir.path().join("session.json"),
        ));

        Self {
            server,
            client,
            session,
            session_dir,
        }
    }

    /// Context whose session file already holds `token`.
    pub async fn logged_in(token: &str) -> Self {
        let ctx = Self::new().await;
        ctx.store()
            .save(&SecretString::from(token.to_string()), "refresh", None)
            .unwrap();
        ctx.reopen()
    }

    /// The session file as a fresh process would see it.
    #[must_use]
    pub fn store(&self) -> SessionStore {
        SessionStore::file(self.session_file())
    }

    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        self.session_dir.path().join("session.json")
    }

    /// Raw contents of the session file, empty object when absent.
    #[must_use]
    pub fn session_file_json(&self) -> Value {
        std::fs::read_to_string(self.session_file())
            .map_or_else(|_| json!({}), |raw| serde_json::from_str(&raw).unwrap())
    }

    /// Simulate a restart: rebuild the session context from the file.
    #[must_use]
    pub fn reopen(self) -> Self {
        let session = SessionContext::restore(self.store());
        Self { session, ..self }
    }

    /// Requests the mock backend has seen so far.
    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.unwrap().len()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

#[must_use]
pub fn user_json() -> Value {
    json!({
        "id": 9,
        "username": "maria",
        "email": "maria@relab.com.br",
        "first_name": "Maria",
        "last_name": "Souza",
        "cpf": "12345678909",
        "telefone": "11987654321",
        "is_active": true
    })
}

/// A listed product as the backend renders it: stored prices as strings,
/// the computed final price as a JSON number.
#[must_use]
pub fn product_json(id: i64, name: &str, price: &str) -> Value {
    let final_price: f64 = price.parse().unwrap();
    json!({
        "id": id,
        "nome": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "preco": price,
        "preco_promocional": null,
        "preco_final": final_price,
        "em_promocao": false,
        "estoque": 10,
        "disponivel_venda": true,
        "imagem": null,
        "categoria": 1,
        "categoria_nome": "Áudio",
        "em_destaque": false
    })
}

/// A cart with one line per `(item_id, quantity, unit_price_cents)`.
#[must_use]
pub fn cart_json(lines: &[(i64, u32, i64)]) -> Value {
    let items: Vec<Value> = lines
        .iter()
        .map(|&(id, quantity, cents)| {
            json!({
                "id": id,
                "produto": id + 100,
                "produto_detalhes": {"id": id + 100, "nome": format!("Produto {id}"), "imagem": null},
                "quantidade": quantity,
                "preco_unitario": money(cents),
                "subtotal": money(cents * i64::from(quantity)),
            })
        })
        .collect();
    let count: u32 = lines.iter().map(|&(_, quantity, _)| quantity).sum();
    let total: i64 = lines
        .iter()
        .map(|&(_, quantity, cents)| cents * i64::from(quantity))
        .sum();

    json!({
        "id": 1,
        "usuario": 9,
        "itens": items,
        "total_itens": count,
        "subtotal": money(total),
        "total": money(total),
    })
}

fn money(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

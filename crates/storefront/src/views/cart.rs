//! Cart panel.
//!
//! # Refresh-on-write
//!
//! The panel never patches its copy of the cart. Every successful mutation
//! (add, quantity change, remove, clear) is followed by a full
//! `GET /carrinho/`, and the totals shown are the ones from that fetch. The
//! cart returned by the mutation itself is discarded.
//!
//! A rejected access token (401/403) ends the session through
//! [`SessionContext::invalidate`]; the panel then shows no cart until the
//! user logs in again.

use std::future::Future;

use relab_core::{Cart, CartItemId, ProductId};
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::error::{AppError, Result};
use crate::session::{SessionContext, SessionState};

const LOAD_FAILED: &str = "Erro ao carregar carrinho";
const ADD_FAILED: &str = "Erro ao adicionar ao carrinho";
const UPDATE_FAILED: &str = "Erro ao atualizar quantidade";
const REMOVE_FAILED: &str = "Erro ao remover item";
const CLEAR_FAILED: &str = "Erro ao limpar carrinho";
const SESSION_EXPIRED: &str = "Sua sessão expirou. Faça login novamente.";

/// What happened when the user pressed "add to cart".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The product is in the cart and the panel shows the refreshed cart.
    Added,
    /// Nobody is logged in; nothing was sent. The login form should open.
    LoginRequired,
}

/// The authenticated user's cart as last fetched.
#[derive(Debug)]
pub struct CartPanel {
    client: ApiClient,
    session: SessionContext,
    changes: watch::Receiver<SessionState>,
    cart: Option<Cart>,
    banner: Option<&'static str>,
}

impl CartPanel {
    #[must_use]
    pub fn new(client: ApiClient, session: SessionContext) -> Self {
        let changes = session.subscribe();
        Self {
            client,
            session,
            changes,
            cart: None,
            banner: None,
        }
    }

    /// The cart from the last successful fetch; `None` when logged out.
    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    /// Badge count for the navigation bar.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.as_ref().map_or(0, |cart| cart.item_count)
    }

    #[must_use]
    pub const fn banner(&self) -> Option<&'static str> {
        self.banner
    }

    pub const fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// React to login/logout since the last call.
    ///
    /// Logging in fetches the cart, logging out drops it.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after a login; see [`Self::refresh`].
    pub async fn sync(&mut self) -> Result<()> {
        if !self.changes.has_changed().unwrap_or(false) {
            return Ok(());
        }
        let authenticated = self.changes.borrow_and_update().is_authenticated();
        if authenticated {
            self.refresh().await
        } else {
            self.cart = None;
            Ok(())
        }
    }

    /// Replace the displayed cart with a fresh copy from the backend.
    ///
    /// Without a session there is nothing to fetch and the panel is emptied.
    ///
    /// # Errors
    ///
    /// On failure the previous cart stays and the banner is set.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<()> {
        self.changes.mark_unchanged();
        let Some(token) = self.session.access_token() else {
            self.cart = None;
            return Ok(());
        };

        match self.client.cart().get(&token).await {
            Ok(cart) => {
                debug!(item_count = cart.item_count, "Cart refreshed");
                self.cart = Some(cart);
                self.banner = None;
                Ok(())
            }
            Err(e) => Err(self.fail(LOAD_FAILED, e)),
        }
    }

    /// Add `quantity` units of `product_id` (the product card adds one).
    ///
    /// # Errors
    ///
    /// On failure the previous cart stays and the banner is set.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add(&mut self, product_id: ProductId, quantity: u32) -> Result<AddOutcome> {
        if !self.session.is_authenticated() {
            return Ok(AddOutcome::LoginRequired);
        }
        let quantity = quantity.max(1);
        self.mutate(ADD_FAILED, move |client, token| async move {
            client
                .cart()
                .add(&token, product_id, quantity)
                .await
                .map(drop)
        })
        .await?;
        Ok(AddOutcome::Added)
    }

    /// Raise a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ItemNotInCart`] if the line is not displayed.
    pub async fn increment(&mut self, item_id: CartItemId) -> Result<()> {
        let quantity = self.quantity_of(item_id)?;
        self.set_quantity(item_id, quantity.saturating_add(1)).await
    }

    /// Lower a line's quantity by one. At quantity 1 this does nothing;
    /// removing a line is a separate action.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ItemNotInCart`] if the line is not displayed.
    pub async fn decrement(&mut self, item_id: CartItemId) -> Result<()> {
        let quantity = self.quantity_of(item_id)?;
        if quantity <= 1 {
            debug!(item_id = %item_id, "Quantity already at minimum");
            return Ok(());
        }
        self.set_quantity(item_id, quantity - 1).await
    }

    /// Set a line's quantity. Zero is treated as removing the line.
    ///
    /// # Errors
    ///
    /// On failure the previous cart stays and the banner is set.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn set_quantity(&mut self, item_id: CartItemId, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return self.remove(item_id).await;
        }
        self.mutate(UPDATE_FAILED, move |client, token| async move {
            client
                .cart()
                .update(&token, item_id, quantity)
                .await
                .map(drop)
        })
        .await
    }

    /// Delete a line.
    ///
    /// # Errors
    ///
    /// On failure the previous cart stays and the banner is set.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove(&mut self, item_id: CartItemId) -> Result<()> {
        self.mutate(REMOVE_FAILED, move |client, token| async move {
            client.cart().remove(&token, item_id).await
        })
        .await
    }

    /// Delete every line.
    ///
    /// # Errors
    ///
    /// On failure the previous cart stays and the banner is set.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> Result<()> {
        self.mutate(CLEAR_FAILED, |client, token| async move {
            client.cart().clear(&token).await
        })
        .await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn quantity_of(&self, item_id: CartItemId) -> Result<u32> {
        self.cart
            .as_ref()
            .and_then(|cart| cart.item(item_id))
            .map(|item| item.quantity)
            .ok_or(AppError::ItemNotInCart(item_id))
    }

    /// Run one gated request, then re-fetch the whole cart.
    async fn mutate<F, Fut>(&mut self, failure: &'static str, request: F) -> Result<()>
    where
        F: FnOnce(ApiClient, SecretString) -> Fut,
        Fut: Future<Output = std::result::Result<(), ApiError>>,
    {
        let Some(token) = self.session.access_token() else {
            return Err(AppError::LoginRequired);
        };

        if let Err(e) = request(self.client.clone(), token).await {
            return Err(self.fail(failure, e));
        }
        self.refresh().await
    }

    fn fail(&mut self, banner: &'static str, error: ApiError) -> AppError {
        if error.is_unauthorized() {
            if let Err(e) = self.session.invalidate() {
                warn!(error = %e, "Failed to clear rejected session");
            }
            self.changes.mark_unchanged();
            self.cart = None;
            self.banner = Some(SESSION_EXPIRED);
        } else {
            warn!(error = %error, banner, "Cart action failed");
            self.banner = Some(banner);
        }
        error.into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::ApiConfig;
    use crate::session::SessionStore;

    fn cart_json(quantity: u32) -> serde_json::Value {
        let amount = format!("{}.00", quantity * 25);
        json!({
            "id": 1,
            "usuario": 9,
            "itens": [{
                "id": 15,
                "produto": 3,
                "produto_detalhes": {"nome": "Fone"},
                "quantidade": quantity,
                "preco_unitario": "25.00",
                "subtotal": amount,
            }],
            "total_itens": quantity,
            "subtotal": amount,
            "total": amount,
        })
    }

    fn panel_for(server: &MockServer, logged_in: bool) -> CartPanel {
        let base = Url::parse(&format!("{}/api/v1", server.uri())).unwrap();
        let client = ApiClient::new(ApiConfig::with_base_url(base)).unwrap();
        let store = SessionStore::memory();
        if logged_in {
            store
                .save(&SecretString::from("tok".to_string()), "ref", None)
                .unwrap();
        }
        CartPanel::new(client, SessionContext::restore(store))
    }

    async fn mount_cart(server: &MockServer, quantity: u32) {
        Mock::given(method("GET"))
            .and(path("/api/v1/carrinho/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(quantity)))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_add_when_anonymous_requires_login() {
        let server = MockServer::start().await;
        let mut panel = panel_for(&server, false);

        let outcome = panel.add(ProductId::new(3), 1).await.unwrap();

        assert_eq!(outcome, AddOutcome::LoginRequired);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_decrement_at_one_sends_nothing() {
        let server = MockServer::start().await;
        mount_cart(&server, 1).await;
        let mut panel = panel_for(&server, true);
        panel.refresh().await.unwrap();

        panel.decrement(CartItemId::new(15)).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method.as_str(), "GET");
    }

    #[tokio::test]
    async fn test_increment_shows_refetched_totals() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/carrinho/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(1)))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        // The mutation answers with a stale body; only the re-fetch counts.
        Mock::given(method("PATCH"))
            .and(path("/api/v1/carrinho/15/atualizar/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(1)))
            .expect(1)
            .mount(&server)
            .await;
        mount_cart(&server, 2).await;

        let mut panel = panel_for(&server, true);
        panel.refresh().await.unwrap();
        panel.increment(CartItemId::new(15)).await.unwrap();

        let cart = panel.cart().unwrap();
        assert_eq!(cart.item(CartItemId::new(15)).unwrap().quantity, 2);
        assert_eq!(cart.display_total().to_string(), "R$ 50.00");
        assert_eq!(panel.item_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_item_is_rejected_locally() {
        let server = MockServer::start().await;
        mount_cart(&server, 1).await;
        let mut panel = panel_for(&server, true);
        panel.refresh().await.unwrap();

        let err = panel.increment(CartItemId::new(99)).await.unwrap_err();
        assert!(matches!(err, AppError::ItemNotInCart(id) if id == CartItemId::new(99)));
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_cart_and_sets_banner() {
        let server = MockServer::start().await;
        mount_cart(&server, 1).await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/carrinho/15/remover/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut panel = panel_for(&server, true);
        panel.refresh().await.unwrap();
        assert!(panel.remove(CartItemId::new(15)).await.is_err());

        assert_eq!(panel.item_count(), 1);
        assert_eq!(panel.banner(), Some(REMOVE_FAILED));
    }

    #[tokio::test]
    async fn test_rejected_token_ends_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/carrinho/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                json!({"detail": "Given token not valid for any token type"}),
            ))
            .mount(&server)
            .await;

        let mut panel = panel_for(&server, true);
        let err = panel.refresh().await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!panel.session.is_authenticated());
        assert!(panel.cart().is_none());
        assert_eq!(panel.banner(), Some(SESSION_EXPIRED));
    }

    #[tokio::test]
    async fn test_sync_drops_cart_after_logout() {
        let server = MockServer::start().await;
        mount_cart(&server, 1).await;
        let mut panel = panel_for(&server, true);
        panel.refresh().await.unwrap();

        panel.session.logout().unwrap();
        panel.sync().await.unwrap();

        assert!(panel.cart().is_none());
        assert_eq!(panel.item_count(), 0);
    }
}

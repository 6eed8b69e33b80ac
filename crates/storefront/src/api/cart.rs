//! Cart endpoints. Every call requires the user's access token.

use relab_core::{Cart, CartItemId, ProductId};
use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use tracing::{info, instrument};

use super::{ApiClient, ApiError, ErrorFormat};

#[derive(Debug, Serialize)]
struct AddItemBody {
    produto_id: ProductId,
    quantidade: u32,
}

#[derive(Debug, Serialize)]
struct UpdateItemBody {
    quantidade: u32,
}

/// `/carrinho/` resource group.
#[derive(Debug, Clone, Copy)]
pub struct CartApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CartApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the cart, created server-side on first access.
    ///
    /// # Errors
    ///
    /// Returns status 401 when the token is missing, expired, or invalid.
    #[instrument(skip_all)]
    pub async fn get(&self, token: &SecretString) -> Result<Cart, ApiError> {
        let url = self.client.url("carrinho/")?;
        let request = self.client.request(Method::GET, url, Some(token));
        self.client.send_json(request, ErrorFormat::Detail).await
    }

    /// Add `quantity` units of a product. Adding a product already in the
    /// cart increases that line's quantity.
    ///
    /// # Errors
    ///
    /// Returns the backend's message when the product is unknown, inactive,
    /// or out of stock.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add(
        &self,
        token: &SecretString,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        let url = self.client.url("carrinho/adicionar/")?;
        let request = self
            .client
            .request(Method::POST, url, Some(token))
            .json(&AddItemBody {
                produto_id: product_id,
                quantidade: quantity,
            });

        let cart: Cart = self.client.send_json(request, ErrorFormat::Detail).await?;
        info!(item_count = cart.item_count, "Item added to cart");
        Ok(cart)
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns the backend's message when the quantity exceeds stock or the
    /// line does not belong to this cart.
    #[instrument(skip(self, token), fields(item_id = %item_id))]
    pub async fn update(
        &self,
        token: &SecretString,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        let url = self.client.url(&format!("carrinho/{item_id}/atualizar/"))?;
        let request = self
            .client
            .request(Method::PATCH, url, Some(token))
            .json(&UpdateItemBody {
                quantidade: quantity,
            });

        self.client.send_json(request, ErrorFormat::Detail).await
    }

    /// Delete a line. The response body is not used.
    ///
    /// # Errors
    ///
    /// Returns status 404 when the line does not exist.
    #[instrument(skip(self, token), fields(item_id = %item_id))]
    pub async fn remove(&self, token: &SecretString, item_id: CartItemId) -> Result<(), ApiError> {
        let url = self.client.url(&format!("carrinho/{item_id}/remover/"))?;
        let request = self.client.request(Method::DELETE, url, Some(token));
        self.client.send(request, ErrorFormat::Detail).await?;
        info!("Cart line removed");
        Ok(())
    }

    /// Delete every line. The response body is not used.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn clear(&self, token: &SecretString) -> Result<(), ApiError> {
        let url = self.client.url("carrinho/limpar/")?;
        let request = self.client.request(Method::DELETE, url, Some(token));
        self.client.send(request, ErrorFormat::Detail).await?;
        info!("Cart cleared");
        Ok(())
    }
}

//! Product and category endpoints.
//!
//! Catalog records are read-only; reads go through the client's cache when
//! one is configured.

use relab_core::{Category, CategoryId, Listing, Product, ProductId};
use reqwest::Method;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use super::{ApiClient, ApiError, ErrorFormat};

// =============================================================================
// ProductQuery
// =============================================================================

/// Filters for the product listing, mapped onto the backend's query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    category: Option<CategoryId>,
    name: Option<String>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    on_promotion: Option<bool>,
    featured: Option<bool>,
}

impl ProductQuery {
    /// No filters: the whole catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only products of this category (`categoria`).
    #[must_use]
    pub const fn category(mut self, id: CategoryId) -> Self {
        self.category = Some(id);
        self
    }

    /// Name contains `term`, case-insensitive, evaluated by the backend (`nome`).
    #[must_use]
    pub fn name(mut self, term: impl Into<String>) -> Self {
        self.name = Some(term.into());
        self
    }

    #[must_use]
    pub const fn min_price(mut self, amount: Decimal) -> Self {
        self.min_price = Some(amount);
        self
    }

    #[must_use]
    pub const fn max_price(mut self, amount: Decimal) -> Self {
        self.max_price = Some(amount);
        self
    }

    #[must_use]
    pub const fn on_promotion(mut self, value: bool) -> Self {
        self.on_promotion = Some(value);
        self
    }

    #[must_use]
    pub const fn featured(mut self, value: bool) -> Self {
        self.featured = Some(value);
        self
    }

    /// The category filter, if any.
    #[must_use]
    pub const fn category_id(&self) -> Option<CategoryId> {
        self.category
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category {
            pairs.push(("categoria", category.to_string()));
        }
        if let Some(name) = self.name.as_ref().filter(|n| !n.is_empty()) {
            pairs.push(("nome", name.clone()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("preco_min", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("preco_max", max.to_string()));
        }
        if let Some(value) = self.on_promotion {
            pairs.push(("em_promocao", value.to_string()));
        }
        if let Some(value) = self.featured {
            pairs.push(("em_destaque", value.to_string()));
        }
        pairs
    }

    /// URL-encoded query string, empty when no filter is set.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

// =============================================================================
// ProductsApi
// =============================================================================

/// `/produtos/` resource group.
#[derive(Debug, Clone, Copy)]
pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductsApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(query = %query.to_query_string()))]
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let query_string = query.to_query_string();
        let key = CacheKey::Products(query_string.clone());
        if let Some(CacheValue::Products(products)) = self.client.cached(&key).await {
            return Ok(products);
        }

        let mut url = self.client.url("produtos/")?;
        if !query_string.is_empty() {
            url.set_query(Some(&query_string));
        }

        let products = self.fetch_listing(url).await?;
        debug!(count = products.len(), "Products loaded");
        self.client
            .store(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Fetch one product with its full detail.
    ///
    /// # Errors
    ///
    /// Returns an error with status 404 if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.client.cached(&key).await {
            return Ok(*product);
        }

        let url = self.client.url(&format!("produtos/{id}/"))?;
        let request = self.client.request(Method::GET, url, None);
        let product: Product = self.client.send_json(request, ErrorFormat::Detail).await?;

        self.client
            .store(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Products highlighted by staff.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn featured(&self) -> Result<Vec<Product>, ApiError> {
        self.cached_listing(CacheKey::Featured, "produtos/destaques/")
            .await
    }

    /// Products currently on promotion.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn promotions(&self) -> Result<Vec<Product>, ApiError> {
        self.cached_listing(CacheKey::Promotions, "produtos/promocoes/")
            .await
    }

    async fn cached_listing(&self, key: CacheKey, path: &str) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.client.cached(&key).await {
            return Ok(products);
        }
        let products = self.fetch_listing(self.client.url(path)?).await?;
        self.client
            .store(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    async fn fetch_listing(&self, url: url::Url) -> Result<Vec<Product>, ApiError> {
        let request = self.client.request(Method::GET, url, None);
        let listing: Listing<Product> = self.client.send_json(request, ErrorFormat::Detail).await?;
        Ok(listing.into_vec())
    }
}

// =============================================================================
// CategoriesApi
// =============================================================================

/// `/produtos/categorias/` resource group.
#[derive(Debug, Clone, Copy)]
pub struct CategoriesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoriesApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// All active categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let key = CacheKey::Categories;
        if let Some(CacheValue::Categories(categories)) = self.client.cached(&key).await {
            return Ok(categories);
        }

        let url = self.client.url("produtos/categorias/")?;
        let request = self.client.request(Method::GET, url, None);
        let listing: Listing<Category> = self.client.send_json(request, ErrorFormat::Detail).await?;
        let categories = listing.into_vec();

        self.client
            .store(key, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// One category with its description.
    ///
    /// # Errors
    ///
    /// Returns an error with status 404 if the category does not exist.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn get(&self, id: CategoryId) -> Result<Category, ApiError> {
        let key = CacheKey::Category(id);
        if let Some(CacheValue::Category(category)) = self.client.cached(&key).await {
            return Ok(*category);
        }

        let url = self.client.url(&format!("produtos/categorias/{id}/"))?;
        let request = self.client.request(Method::GET, url, None);
        let category: Category = self.client.send_json(request, ErrorFormat::Detail).await?;

        self.client
            .store(key, CacheValue::Category(Box::new(category.clone())))
            .await;
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        assert_eq!(ProductQuery::new().to_query_string(), "");
    }

    #[test]
    fn test_category_filter() {
        let query = ProductQuery::new().category(CategoryId::new(4));
        assert_eq!(query.to_query_string(), "categoria=4");
        assert_eq!(query.category_id(), Some(CategoryId::new(4)));
    }

    #[test]
    fn test_all_filters_are_encoded() {
        let query = ProductQuery::new()
            .category(CategoryId::new(2))
            .name("fone sem fio")
            .min_price(Decimal::new(5000, 2))
            .max_price(Decimal::from(300))
            .on_promotion(true)
            .featured(false);
        assert_eq!(
            query.to_query_string(),
            "categoria=2&nome=fone+sem+fio&preco_min=50.00&preco_max=300&em_promocao=true&em_destaque=false"
        );
    }

    #[test]
    fn test_blank_name_is_ignored() {
        assert_eq!(ProductQuery::new().name("").to_query_string(), "");
    }
}

//! Product grid with category filter and search box.

use relab_core::{Category, CategoryId, Product};
use tracing::{instrument, warn};

use crate::api::{ApiClient, ProductQuery};
use crate::error::Result;

const PRODUCTS_FAILED: &str = "Erro ao carregar produtos";
const CATEGORIES_FAILED: &str = "Erro ao carregar categorias";

/// Catalog state shown on the home page.
///
/// The search term filters locally; the category filter is applied by the
/// backend and therefore reloads the product list.
#[derive(Debug)]
pub struct CatalogView {
    client: ApiClient,
    products: Vec<Product>,
    categories: Vec<Category>,
    active_category: Option<CategoryId>,
    search: String,
    banner: Option<&'static str>,
}

impl CatalogView {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self {
            client,
            products: Vec::new(),
            categories: Vec::new(),
            active_category: None,
            search: String::new(),
            banner: None,
        }
    }

    /// Replace the product list with the products of `category` (all when `None`).
    ///
    /// # Errors
    ///
    /// On failure the previous list stays and the banner is set.
    #[instrument(skip(self))]
    pub async fn load_products(&mut self, category: Option<CategoryId>) -> Result<()> {
        let query = category.map_or_else(ProductQuery::new, |id| ProductQuery::new().category(id));
        self.load(&query).await
    }

    /// Replace the product list with an arbitrary filter.
    ///
    /// # Errors
    ///
    /// On failure the previous list stays and the banner is set.
    pub async fn load(&mut self, query: &ProductQuery) -> Result<()> {
        let result = self.client.products().list(query).await;
        self.apply_products(result)
    }

    /// Replace the product list with the featured products.
    ///
    /// # Errors
    ///
    /// On failure the previous list stays and the banner is set.
    pub async fn load_featured(&mut self) -> Result<()> {
        let result = self.client.products().featured().await;
        self.apply_products(result)
    }

    /// Replace the product list with the products on promotion.
    ///
    /// # Errors
    ///
    /// On failure the previous list stays and the banner is set.
    pub async fn load_promotions(&mut self) -> Result<()> {
        let result = self.client.products().promotions().await;
        self.apply_products(result)
    }

    /// Replace the category list.
    ///
    /// # Errors
    ///
    /// On failure the previous list stays and the banner is set.
    #[instrument(skip(self))]
    pub async fn load_categories(&mut self) -> Result<()> {
        match self.client.categories().list().await {
            Ok(categories) => {
                self.categories = categories;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load categories");
                self.banner = Some(CATEGORIES_FAILED);
                Err(e.into())
            }
        }
    }

    /// Make `category` the active filter and reload the products.
    ///
    /// # Errors
    ///
    /// On failure the previous list stays and the banner is set.
    pub async fn select_category(&mut self, category: Option<CategoryId>) -> Result<()> {
        self.active_category = category;
        self.load_products(category).await
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Loaded products whose name contains the search term, ignoring case.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.name_matches(&self.search))
            .collect()
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub const fn active_category(&self) -> Option<CategoryId> {
        self.active_category
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn banner(&self) -> Option<&'static str> {
        self.banner
    }

    fn apply_products(
        &mut self,
        result: std::result::Result<Vec<Product>, crate::api::ApiError>,
    ) -> Result<()> {
        match result {
            Ok(products) => {
                self.products = products;
                self.banner = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load products");
                self.banner = Some(PRODUCTS_FAILED);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::ApiConfig;

    fn product(id: i64, name: &str) -> serde_json::Value {
        json!({"id": id, "nome": name, "preco": "10.00", "preco_final": 10.0})
    }

    fn view_for(server: &MockServer) -> CatalogView {
        let base = Url::parse(&format!("{}/api/v1", server.uri())).unwrap();
        CatalogView::new(ApiClient::new(ApiConfig::with_base_url(base)).unwrap())
    }

    #[tokio::test]
    async fn test_select_category_reloads_with_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/produtos/"))
            .and(query_param("categoria", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"count": 1, "results": [product(1, "Fone Bluetooth")]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut view = view_for(&server);
        view.select_category(Some(CategoryId::new(2))).await.unwrap();

        assert_eq!(view.active_category(), Some(CategoryId::new(2)));
        assert_eq!(view.products().len(), 1);
    }

    #[tokio::test]
    async fn test_search_filters_locally() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/produtos/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                product(1, "Fone Bluetooth"),
                product(2, "Cabo USB"),
                product(3, "fone com fio"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let mut view = view_for(&server);
        view.load_products(None).await.unwrap();
        assert_eq!(view.visible_products().len(), 3);

        view.set_search("FONE");
        let names: Vec<_> = view.visible_products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Fone Bluetooth", "fone com fio"]);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_products() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/produtos/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([product(1, "Fone")])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/produtos/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut view = view_for(&server);
        view.load_products(None).await.unwrap();
        assert!(view.load_products(None).await.is_err());

        assert_eq!(view.products().len(), 1);
        assert_eq!(view.banner(), Some(PRODUCTS_FAILED));
    }

    #[tokio::test]
    async fn test_load_categories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/produtos/categorias/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "nome": "Áudio", "slug": "audio"},
                {"id": 2, "nome": "Cabos", "slug": "cabos"},
            ])))
            .mount(&server)
            .await;

        let mut view = view_for(&server);
        view.load_categories().await.unwrap();
        assert_eq!(view.categories().len(), 2);
        assert!(view.banner().is_none());
    }
}

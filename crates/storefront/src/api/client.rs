//! Shared request plumbing for every resource group.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::{ApiError, AuthApi, CartApi, CategoriesApi, ErrorFormat, ProductsApi, error_message};
use crate::config::ApiConfig;

const CACHE_CAPACITY: u64 = 1000;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    config: ApiConfig,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("cache", &self.inner.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let cache = (!config.catalog_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(config.catalog_cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                config,
                cache,
            }),
        })
    }

    /// Settings this client was built with.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Login and registration.
    #[must_use]
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Product catalog.
    #[must_use]
    pub const fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(self)
    }

    /// Product categories.
    #[must_use]
    pub const fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi::new(self)
    }

    /// The authenticated user's cart.
    #[must_use]
    pub const fn cart(&self) -> CartApi<'_> {
        CartApi::new(self)
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    /// Resolve a resource path (no leading slash) against the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.config.base_url.join(path)?)
    }

    /// Start a request, attaching the bearer token when one is given.
    pub(crate) fn request(
        &self,
        method: Method,
        url: Url,
        token: Option<&SecretString>,
    ) -> RequestBuilder {
        let request = self.inner.http.request(method, url);
        match token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request and decode the JSON body of a success response.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        format: ErrorFormat,
    ) -> Result<T, ApiError> {
        let body = self.send(request, format).await?;

        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Decode(e)
        })
    }

    /// Send a request and return the raw body of a success response.
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        format: ErrorFormat,
    ) -> Result<String, ApiError> {
        let response = request.send().await.inspect_err(|e| {
            warn!(error = %e, "API request failed");
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &body, format);
            debug!(status = %status, message = %message, "API returned non-success status");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    // =========================================================================
    // Catalog cache
    // =========================================================================

    pub(crate) async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        let cache = self.inner.cache.as_ref()?;
        let value = cache.get(key).await;
        if value.is_some() {
            debug!(key = ?key, "Cache hit");
        }
        value
    }

    pub(crate) async fn store(&self, key: CacheKey, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }
}

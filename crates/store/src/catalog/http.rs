//! REST client for a FakeStore-compatible catalog service.
//!
//! Uses `reqwest` for HTTP and caches successful responses with `moka`.
//! Failures are never cached, so a retry always reaches the service.

use std::sync::Arc;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use shopmall_core::{Product, ProductId};
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use super::{CatalogError, CatalogSource};
use crate::config::CatalogConfig;

/// Maximum characters of a response body copied into logs and errors.
const BODY_PREVIEW_CHARS: usize = 500;

/// HTTP catalog client.
///
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct HttpCatalogClient {
    inner: Arc<HttpCatalogClientInner>,
}

struct HttpCatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl std::fmt::Debug for HttpCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogClient")
            .field("base_url", &self.inner.base_url)
            .field("cached", &self.inner.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpCatalogClient {
    /// Create a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(HttpCatalogClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Full URL for a path below the service root.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Fetch the product list.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// payload that is not a product array.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.cached(CacheKey::Products).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.get_json("products").await?;
        debug!(count = products.len(), "Fetched products");

        self.store(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Fetch the category labels.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// payload that is not a string array.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) = self.cached(CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<String> = self.get_json("products/categories").await?;
        debug!(count = categories.len(), "Fetched categories");

        self.store(
            CacheKey::Categories,
            CacheValue::Categories(categories.clone()),
        )
        .await;
        Ok(categories)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the service answers 404 or
    /// with an empty body, and the usual transport/status/parse errors
    /// otherwise.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.cached(key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Option<Product> = match self.get_json(&format!("products/{id}")).await {
            Err(CatalogError::Status { status: 404, .. }) => None,
            other => other?,
        };
        let product = product.ok_or(CatalogError::NotFound(id))?;

        self.store(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Drop every cached response.
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
        }
    }

    async fn cached(&self, key: CacheKey) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(&key).await,
            None => None,
        }
    }

    async fn store(&self, key: CacheKey, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }

    /// GET a path and decode the JSON body.
    ///
    /// An empty body decodes as JSON `null`, so `Option<T>` targets see `None`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.endpoint(path);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                url = %url,
                body = %preview(&body),
                "Catalog service returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let text = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(text).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body = %preview(&body),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

impl CatalogSource for HttpCatalogClient {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.get_products().await
    }

    async fn fetch_categories(&self) -> Result<Vec<String>, CatalogError> {
        self.get_categories().await
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.get_product(id).await
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config(base: &str, ttl: u64) -> CatalogConfig {
        CatalogConfig {
            base_url: url::Url::parse(base).unwrap(),
            request_timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(ttl),
        }
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = HttpCatalogClient::new(&config("https://fakestoreapi.com/", 300)).unwrap();
        assert_eq!(
            client.endpoint("products/categories"),
            "https://fakestoreapi.com/products/categories"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = HttpCatalogClient::new(&config("http://localhost:8080/api", 0)).unwrap();
        assert_eq!(client.endpoint("/products"), "http://localhost:8080/api/products");
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let client = HttpCatalogClient::new(&config("http://localhost", 0)).unwrap();
        assert!(client.inner.cache.is_none());
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(BODY_PREVIEW_CHARS * 2);
        assert_eq!(preview(&long).len(), BODY_PREVIEW_CHARS);
    }
}

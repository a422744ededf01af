//! Catalog coordination: remote fetches reconciled against the bundled fallback.
//!
//! [`CatalogCoordinator`] wraps every call to a [`CatalogSource`] in the
//! requested/fulfilled/rejected action sequence. It never writes state
//! directly, so concurrent loads settle in whatever order their calls
//! complete and the last one applied wins.

mod cache;
pub mod fallback;
mod http;

use std::future::Future;
use std::sync::Arc;

use shopmall_core::{CategoryFilter, Product, ProductId};
use thiserror::Error;
use tracing::instrument;

pub use http::HttpCatalogClient;

use crate::action::CatalogAction;
use crate::selectors;
use crate::store::Store;

/// Errors from catalog sources.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("catalog service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("failed to parse catalog response: {0}")]
    Parse(#[from] serde_json::Error),

    /// No product with the requested id.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// The source is unavailable for another reason.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Somewhere products and categories can be fetched from.
///
/// Implemented by [`HttpCatalogClient`]; tests provide in-memory sources.
pub trait CatalogSource: Send + Sync + 'static {
    /// Fetch the full product list.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Fetch the category labels.
    fn fetch_categories(&self) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send;

    /// Fetch a single product.
    fn fetch_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;
}

/// Drives catalog fetches and filter changes through the store.
pub struct CatalogCoordinator<S> {
    store: Store,
    source: Arc<S>,
}

impl<S> Clone for CatalogCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            source: Arc::clone(&self.source),
        }
    }
}

impl<S> std::fmt::Debug for CatalogCoordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCoordinator")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<S: CatalogSource> CatalogCoordinator<S> {
    /// Create a coordinator dispatching into `store`.
    #[must_use]
    pub fn new(store: Store, source: S) -> Self {
        Self {
            store,
            source: Arc::new(source),
        }
    }

    /// The store this coordinator dispatches into.
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// The underlying source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the product list and replace the catalog's products with it.
    ///
    /// On failure the current products are kept and the error message is
    /// recorded; nothing is returned to the caller. Dropping the future
    /// before the source answers settles the loading count without touching
    /// products or errors.
    #[instrument(skip(self))]
    pub async fn load_catalog(&self) {
        let pending = self.store.begin(
            CatalogAction::ProductsRequested,
            CatalogAction::ProductsAbandoned,
        );

        match self.source.fetch_products().await {
            Ok(products) => {
                tracing::info!(count = products.len(), "Catalog products loaded");
                pending.settle(CatalogAction::ProductsFulfilled(products));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load catalog products, keeping current list");
                pending.settle(CatalogAction::ProductsRejected(e.to_string()));
            }
        }
    }

    /// Fetch the category labels and replace the catalog's categories.
    ///
    /// Same failure behavior as [`Self::load_catalog`].
    #[instrument(skip(self))]
    pub async fn load_categories(&self) {
        let pending = self.store.begin(
            CatalogAction::CategoriesRequested,
            CatalogAction::CategoriesAbandoned,
        );

        match self.source.fetch_categories().await {
            Ok(categories) => {
                tracing::info!(count = categories.len(), "Catalog categories loaded");
                pending.settle(CatalogAction::CategoriesFulfilled(categories));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load categories, keeping current list");
                pending.settle(CatalogAction::CategoriesRejected(e.to_string()));
            }
        }
    }

    /// Load products and categories concurrently.
    pub async fn load_all(&self) {
        tokio::join!(self.load_catalog(), self.load_categories());
    }

    /// Set the active filter from a label; `"all"` clears it.
    ///
    /// Labels are not checked against known categories; an unknown label
    /// simply matches nothing.
    pub fn select_category(&self, label: &str) {
        self.store
            .dispatch(CatalogAction::SelectCategory(CategoryFilter::from_label(
                label,
            )));
    }

    /// Forget any recorded fetch errors.
    pub fn clear_errors(&self) {
        self.store.dispatch(CatalogAction::ClearErrors);
    }

    /// Fetch one product for a detail view.
    ///
    /// The result is returned to the caller only; the catalog slice is not
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns the source's error, including [`CatalogError::NotFound`].
    #[instrument(skip(self), fields(id = %id))]
    pub async fn load_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.source.fetch_product(id).await
    }

    /// Products passing the active filter in the current snapshot.
    #[must_use]
    pub fn visible_products(&self) -> Vec<Product> {
        let state = self.store.state();
        selectors::visible_products(&state)
            .into_iter()
            .cloned()
            .collect()
    }
}

//! Catalog slice: products, categories and the active filter.

use serde::Serialize;
use shopmall_core::{CategoryFilter, Product};

use crate::action::CatalogAction;
use crate::catalog::fallback;

/// Progress of one remote resource (products or categories).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FetchStatus {
    in_flight: u32,
    error: Option<String>,
}

impl FetchStatus {
    /// Whether any request for this resource is still outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Number of outstanding requests.
    #[must_use]
    pub const fn in_flight(&self) -> u32 {
        self.in_flight
    }

    /// Message from the most recent failure, until the next request or clear.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn requested(&mut self) {
        self.in_flight = self.in_flight.saturating_add(1);
        self.error = None;
    }

    fn fulfilled(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn rejected(&mut self, message: String) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.error = Some(message);
    }

    fn abandoned(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

/// Products, categories and the active filter.
///
/// Both lists start as the bundled fallback dataset and are only ever
/// replaced wholesale by a successful fetch. A failed fetch leaves them as
/// they were.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogState {
    products: Vec<Product>,
    categories: Vec<String>,
    selected: CategoryFilter,
    products_status: FetchStatus,
    categories_status: FetchStatus,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(fallback::products(), fallback::categories())
    }
}

impl CatalogState {
    /// Create a catalog seeded with the given lists and the `all` filter.
    #[must_use]
    pub fn new(products: Vec<Product>, categories: Vec<String>) -> Self {
        Self {
            products,
            categories: normalize_categories(categories),
            selected: CategoryFilter::All,
            products_status: FetchStatus::default(),
            categories_status: FetchStatus::default(),
        }
    }

    /// All products, in service order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct category labels, excluding the virtual `all`.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The active filter.
    #[must_use]
    pub const fn selected(&self) -> &CategoryFilter {
        &self.selected
    }

    /// Status of product list fetches.
    #[must_use]
    pub const fn products_status(&self) -> &FetchStatus {
        &self.products_status
    }

    /// Status of category list fetches.
    #[must_use]
    pub const fn categories_status(&self) -> &FetchStatus {
        &self.categories_status
    }

    /// Apply a catalog action, returning the next state.
    #[must_use]
    pub fn reduce(&self, action: CatalogAction) -> Self {
        let mut next = self.clone();

        match action {
            CatalogAction::ProductsRequested => next.products_status.requested(),
            CatalogAction::ProductsFulfilled(products) => {
                next.products_status.fulfilled();
                next.products = products;
            }
            CatalogAction::ProductsRejected(message) => next.products_status.rejected(message),
            CatalogAction::ProductsAbandoned => next.products_status.abandoned(),
            CatalogAction::CategoriesRequested => next.categories_status.requested(),
            CatalogAction::CategoriesFulfilled(categories) => {
                next.categories_status.fulfilled();
                next.categories = normalize_categories(categories);
            }
            CatalogAction::CategoriesRejected(message) => {
                next.categories_status.rejected(message);
            }
            CatalogAction::CategoriesAbandoned => next.categories_status.abandoned(),
            CatalogAction::SelectCategory(filter) => next.selected = filter,
            CatalogAction::ClearErrors => {
                next.products_status.error = None;
                next.categories_status.error = None;
            }
        }

        next
    }
}

/// Drop duplicates (first occurrence wins) and the reserved `all` label.
fn normalize_categories(categories: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    categories
        .into_iter()
        .filter(|label| label != CategoryFilter::ALL_LABEL)
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

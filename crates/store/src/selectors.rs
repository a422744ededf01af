//! Pure read-only projections over a snapshot.
//!
//! Nothing here is cached; every call recomputes from the [`AppState`] it
//! is given.

use shopmall_core::{CategoryFilter, Email, Price, Product, ProductId};

use crate::state::{AppState, CartLine, SessionStatus};

/// Products passing the active filter, in catalog order.
#[must_use]
pub fn visible_products(state: &AppState) -> Vec<&Product> {
    let filter = state.catalog.selected();
    state
        .catalog
        .products()
        .iter()
        .filter(|product| filter.matches(&product.category))
        .collect()
}

/// Filter buttons to render: `all` first, then each known category.
#[must_use]
pub fn category_filters(state: &AppState) -> Vec<CategoryFilter> {
    std::iter::once(CategoryFilter::All)
        .chain(
            state
                .catalog
                .categories()
                .iter()
                .map(|label| CategoryFilter::Category(label.clone())),
        )
        .collect()
}

/// Look up a product in the current catalog.
#[must_use]
pub fn product_by_id(state: &AppState, id: ProductId) -> Option<&Product> {
    state.catalog.products().iter().find(|product| product.id == id)
}

/// Whether either catalog resource is still loading.
#[must_use]
pub fn is_catalog_loading(state: &AppState) -> bool {
    state.catalog.products_status().is_loading() || state.catalog.categories_status().is_loading()
}

/// The catalog error to show, products first.
#[must_use]
pub fn catalog_error(state: &AppState) -> Option<&str> {
    state
        .catalog
        .products_status()
        .error()
        .or_else(|| state.catalog.categories_status().error())
}

/// Total units across all cart lines (the header badge).
#[must_use]
pub fn cart_item_count(state: &AppState) -> u64 {
    state
        .cart
        .lines()
        .iter()
        .map(|line| u64::from(line.quantity))
        .sum()
}

/// Unit price times quantity for one line.
#[must_use]
pub fn line_total(line: &CartLine) -> Price {
    line.line_total()
}

/// The cart total.
#[must_use]
pub fn cart_total(state: &AppState) -> Price {
    state.cart.total()
}

/// Current session status.
#[must_use]
pub fn session_status(state: &AppState) -> SessionStatus {
    state.session.status()
}

/// Whether someone is signed in, regardless of any operation in flight.
#[must_use]
pub fn is_authenticated(state: &AppState) -> bool {
    state.session.identity().is_some()
}

/// Email of the signed-in identity.
#[must_use]
pub fn current_email(state: &AppState) -> Option<&Email> {
    state.session.identity().map(|identity| &identity.email)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopmall_core::{Price, Rating};

    use super::*;
    use crate::action::{CartAction, CatalogAction};

    fn product(id: i32, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("P{id}"),
            price: Price::from_cents(500),
            description: String::new(),
            category: category.to_string(),
            image: String::new(),
            rating: Rating::default(),
        }
    }

    fn with_products(products: Vec<Product>) -> AppState {
        AppState::default().reduce(CatalogAction::ProductsFulfilled(products).into())
    }

    #[test]
    fn test_visible_products_filters_and_keeps_order() {
        let state = with_products(vec![
            product(3, "home"),
            product(1, "sports"),
            product(2, "home"),
        ])
        .reduce(CatalogAction::SelectCategory(CategoryFilter::from("home")).into());

        let ids: Vec<i32> = visible_products(&state)
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_all_returns_full_list_after_any_filter() {
        let state = with_products(vec![product(1, "a"), product(2, "b")])
            .reduce(CatalogAction::SelectCategory(CategoryFilter::from("b")).into())
            .reduce(CatalogAction::SelectCategory(CategoryFilter::from("all")).into());
        assert_eq!(visible_products(&state).len(), 2);
    }

    #[test]
    fn test_unknown_category_yields_empty() {
        let state = AppState::default()
            .reduce(CatalogAction::SelectCategory(CategoryFilter::from("jewelery")).into());
        assert!(visible_products(&state).is_empty());
    }

    #[test]
    fn test_category_filters_start_with_all() {
        let filters = category_filters(&AppState::default());
        assert_eq!(filters.first(), Some(&CategoryFilter::All));
        assert_eq!(filters.len(), 6);
    }

    #[test]
    fn test_cart_item_count_sums_quantities() {
        let state = AppState::default()
            .reduce(CartAction::add(&product(1, "a")).into())
            .reduce(CartAction::add(&product(1, "a")).into())
            .reduce(CartAction::add(&product(2, "a")).into());
        assert_eq!(cart_item_count(&state), 3);
        assert_eq!(cart_total(&state), Price::from_cents(1500));
        assert_eq!(line_total(&state.cart.lines()[0]), Price::from_cents(1000));
    }

    #[test]
    fn test_catalog_error_prefers_products() {
        let state = AppState::default()
            .reduce(CatalogAction::CategoriesRejected("c".to_string()).into());
        assert_eq!(catalog_error(&state), Some("c"));

        let state = state.reduce(CatalogAction::ProductsRejected("p".to_string()).into());
        assert_eq!(catalog_error(&state), Some("p"));
    }

    #[test]
    fn test_product_by_id_uses_fallback() {
        let state = AppState::default();
        assert_eq!(
            product_by_id(&state, ProductId::new(4)).unwrap().title,
            "Coffee Mug"
        );
        assert!(product_by_id(&state, ProductId::new(404)).is_none());
    }
}

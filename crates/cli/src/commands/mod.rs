//! CLI command implementations.
//!
//! Every command builds a [`Context`] holding one store and the two
//! coordinators that feed it, then reads results back through selectors.

pub mod catalog;
pub mod demo;
pub mod session;

use shopmall_core::Product;
use shopmall_store::{
    AppState, CartLedger, CatalogCoordinator, CatalogError, CheckoutError, HttpCatalogClient,
    InMemoryIdentityProvider, SessionBridge, Store, StoreConfig, selectors,
};
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Catalog client setup or a product lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A sign-in or sign-up did not produce an identity.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Checkout was refused.
    #[error("checkout failed: {0}")]
    Checkout(#[from] CheckoutError),
}

/// Store plus the coordinators a command drives.
pub struct Context {
    pub store: Store,
    pub cart: CartLedger,
    pub catalog: CatalogCoordinator<HttpCatalogClient>,
    pub session: SessionBridge<InMemoryIdentityProvider>,
    pub offline: bool,
}

impl Context {
    /// Wire a fresh store to the configured catalog service and the demo
    /// identity provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StoreConfig, offline: bool) -> Result<Self, CommandError> {
        let store = Store::new();
        let client = HttpCatalogClient::new(&config.catalog)?;

        Ok(Self {
            cart: CartLedger::new(store.clone()),
            catalog: CatalogCoordinator::new(store.clone(), client),
            session: SessionBridge::new(
                store.clone(),
                InMemoryIdentityProvider::with_demo_accounts(),
            ),
            store,
            offline,
        })
    }

    /// Load products and categories unless running offline.
    pub async fn load_catalog(&self) {
        if self.offline {
            tracing::info!("Offline mode, using bundled catalog");
            return;
        }
        self.catalog.load_all().await;

        if let Some(error) = selectors::catalog_error(&self.store.state()) {
            tracing::warn!(error, "Catalog service unavailable, showing bundled catalog");
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_products(state: &AppState) {
    let filters: Vec<String> = selectors::category_filters(state)
        .iter()
        .map(|filter| {
            if filter == state.catalog.selected() {
                format!("[{filter}]")
            } else {
                filter.to_string()
            }
        })
        .collect();
    println!("{}", filters.join("  "));
    println!();

    let products = selectors::visible_products(state);
    if products.is_empty() {
        println!("  (no products in this category)");
    }
    for product in products {
        println!(
            "  #{:<4} {:<50} {:>10}  {}",
            product.id,
            truncate(&product.title, 50),
            product.price.display(),
            product.category
        );
    }
}

#[allow(clippy::print_stdout)]
fn print_product(product: &Product) {
    println!("#{} {}", product.id, product.title);
    println!("  Price:    {}", product.price.display());
    println!("  Category: {}", product.category);
    println!(
        "  Rating:   {:.1} ({} reviews)",
        product.rating.rate, product.rating.count
    );
    if !product.description.is_empty() {
        println!();
        println!("  {}", product.description);
    }
}

#[allow(clippy::print_stdout)]
fn print_cart(state: &AppState) {
    println!(
        "Cart ({} items)",
        selectors::cart_item_count(state)
    );
    for line in state.cart.lines() {
        println!(
            "  {:<40} {:>3} x {:>9} = {:>10}",
            truncate(&line.title, 40),
            line.quantity,
            line.price.display(),
            selectors::line_total(line).display()
        );
    }
    println!("  Total: {}", selectors::cart_total(state).display());
}

#[allow(clippy::print_stdout)]
fn print_session(state: &AppState) {
    match selectors::current_email(state) {
        Some(email) => println!("Signed in as {email}"),
        None => println!("Not signed in"),
    }
    if let Some(error) = state.session.error() {
        println!("  Last error: {error}");
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(3)).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Coffee Mug", 40), "Coffee Mug");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }
}

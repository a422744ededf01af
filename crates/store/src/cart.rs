//! Cart ledger: the cart operations views call.
//!
//! Each method dispatches one [`CartAction`]; the arithmetic lives in
//! [`CartState::reduce`](crate::state::CartState::reduce).

use shopmall_core::{Price, Product, ProductId};

use crate::action::CartAction;
use crate::store::Store;

/// Handle for mutating the cart slice.
#[derive(Debug, Clone)]
pub struct CartLedger {
    store: Store,
}

impl CartLedger {
    /// Create a ledger dispatching into `store`.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// The store this ledger dispatches into.
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Add one unit, creating the line with the given details on first add.
    pub fn add_item(
        &self,
        product_id: ProductId,
        title: impl Into<String>,
        price: Price,
        image: impl Into<String>,
    ) {
        self.store.dispatch(CartAction::AddItem {
            product_id,
            title: title.into(),
            price,
            image: image.into(),
        });
    }

    /// Add one unit of a catalog product.
    pub fn add_product(&self, product: &Product) {
        self.store.dispatch(CartAction::add(product));
    }

    /// Set a line's quantity; zero or less removes it.
    pub fn set_quantity(&self, product_id: ProductId, quantity: i64) {
        self.store.dispatch(CartAction::SetQuantity {
            product_id,
            quantity,
        });
    }

    /// Remove a line if present.
    pub fn remove_item(&self, product_id: ProductId) {
        self.store.dispatch(CartAction::RemoveItem(product_id));
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.store.dispatch(CartAction::Clear);
    }
}

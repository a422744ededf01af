//! Application state snapshot and its three slices.
//!
//! Each slice sits behind its own `Arc`. Reducing an action rebuilds only
//! the owning slice, so the other two stay pointer-equal between versions
//! and views can skip work with [`Arc::ptr_eq`].

mod cart;
mod catalog;
mod session;

use std::sync::Arc;

pub use cart::{CartLine, CartState};
pub use catalog::{CatalogState, FetchStatus};
pub use session::{SessionState, SessionStatus};

use crate::action::Action;

/// One immutable snapshot of the whole store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    /// Incremented once per applied action; 0 for the initial snapshot.
    pub version: u64,
    /// Owned by the catalog coordinator.
    pub catalog: Arc<CatalogState>,
    /// Owned by the cart ledger.
    pub cart: Arc<CartState>,
    /// Owned by the session bridge.
    pub session: Arc<SessionState>,
}

impl AppState {
    /// Route `action` to its slice and build the next snapshot.
    #[must_use]
    pub fn reduce(&self, action: Action) -> Self {
        let mut next = Self {
            version: self.version.wrapping_add(1),
            catalog: Arc::clone(&self.catalog),
            cart: Arc::clone(&self.cart),
            session: Arc::clone(&self.session),
        };

        match action {
            Action::Catalog(action) => next.catalog = Arc::new(self.catalog.reduce(action)),
            Action::Cart(action) => next.cart = Arc::new(self.cart.reduce(action)),
            Action::Session(action) => next.session = Arc::new(self.session.reduce(action)),
        }

        next
    }
}

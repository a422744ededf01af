//! ShopMall Store - Reactive client state core.
//!
//! One subscribable container holds an immutable [`AppState`] snapshot made
//! of three slices, each exclusively owned by one component:
//!
//! - **catalog** - products and categories, seeded from a bundled fallback
//!   dataset and replaced wholesale by [`catalog::CatalogCoordinator`] fetches
//! - **cart** - cart lines and their exact decimal total
//! - **session** - the signed-in identity, fed by [`session::SessionBridge`]
//!   from explicit credential operations and provider push events
//!
//! # Architecture
//!
//! ```text
//!  views ──dispatch(Action)──▶ Store ──reduce──▶ AppState (Arc per slice)
//!    ▲                           │
//!    └──── selectors ◀── notify ─┘
//!
//!  CatalogCoordinator ─┐  requested → fulfilled | rejected
//!  SessionBridge ──────┴─▶ Store::dispatch (only way back into state)
//! ```
//!
//! Every transition goes through [`Store::dispatch`], which applies one
//! action at a time and notifies subscribers before the next one runs.
//! Async coordinators never touch state directly; they dispatch once their
//! external call settles, and the last action applied wins.
//!
//! # Example
//!
//! ```rust
//! use shopmall_core::{Price, ProductId};
//! use shopmall_store::{CartAction, Store, selectors};
//!
//! let store = Store::new();
//! store.dispatch(CartAction::AddItem {
//!     product_id: ProductId::new(4),
//!     title: "Coffee Mug".to_string(),
//!     price: Price::from_cents(1299),
//!     image: String::new(),
//! });
//!
//! let state = store.state();
//! assert_eq!(selectors::cart_item_count(&state), 1);
//! assert_eq!(selectors::cart_total(&state).display(), "$12.99");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod action;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod selectors;
pub mod session;
pub mod state;
pub mod store;
pub mod telemetry;

pub use action::{Action, CartAction, CatalogAction, CredentialOperation, SessionAction};
pub use cart::CartLedger;
pub use catalog::{CatalogCoordinator, CatalogError, CatalogSource, HttpCatalogClient};
pub use checkout::{CheckoutError, CheckoutSummary, checkout};
pub use config::{CatalogConfig, ConfigError, StoreConfig};
pub use session::{AuthError, IdentityProvider, InMemoryIdentityProvider, SessionBridge};
pub use state::{
    AppState, CartLine, CartState, CatalogState, FetchStatus, SessionState, SessionStatus,
};
pub use store::{Store, Subscription};

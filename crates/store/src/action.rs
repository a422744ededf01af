//! Typed actions, one enum per slice.
//!
//! [`Action`] is the only way to change an [`AppState`](crate::AppState).
//! The outer variant decides which slice reduces it; no action is ever seen
//! by more than one slice.

use shopmall_core::{CategoryFilter, Identity, Price, Product, ProductId};

/// An action routed by the store to exactly one slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Handled by the catalog slice.
    Catalog(CatalogAction),
    /// Handled by the cart slice.
    Cart(CartAction),
    /// Handled by the session slice.
    Session(SessionAction),
}

impl Action {
    /// Stable name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Catalog(action) => action.name(),
            Self::Cart(action) => action.name(),
            Self::Session(action) => action.name(),
        }
    }
}

impl From<CatalogAction> for Action {
    fn from(action: CatalogAction) -> Self {
        Self::Catalog(action)
    }
}

impl From<CartAction> for Action {
    fn from(action: CartAction) -> Self {
        Self::Cart(action)
    }
}

impl From<SessionAction> for Action {
    fn from(action: SessionAction) -> Self {
        Self::Session(action)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Catalog slice actions.
///
/// Fetches are three-phase: `*Requested` when the call starts, then exactly
/// one of `*Fulfilled`, `*Rejected` or `*Abandoned` when it settles. A fetch
/// is abandoned when its future is dropped before the source answers.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    /// A product list fetch started.
    ProductsRequested,
    /// A product list fetch succeeded; replaces the list wholesale.
    ProductsFulfilled(Vec<Product>),
    /// A product list fetch failed; the list is kept.
    ProductsRejected(String),
    /// A product list fetch was dropped unanswered; only the loading count
    /// changes.
    ProductsAbandoned,
    /// A category list fetch started.
    CategoriesRequested,
    /// A category list fetch succeeded; replaces the list wholesale.
    CategoriesFulfilled(Vec<String>),
    /// A category list fetch failed; the list is kept.
    CategoriesRejected(String),
    /// A category list fetch was dropped unanswered.
    CategoriesAbandoned,
    /// Change the active filter.
    SelectCategory(CategoryFilter),
    /// Forget both fetch error messages.
    ClearErrors,
}

impl CatalogAction {
    /// Stable name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProductsRequested => "catalog/products_requested",
            Self::ProductsFulfilled(_) => "catalog/products_fulfilled",
            Self::ProductsRejected(_) => "catalog/products_rejected",
            Self::ProductsAbandoned => "catalog/products_abandoned",
            Self::CategoriesRequested => "catalog/categories_requested",
            Self::CategoriesFulfilled(_) => "catalog/categories_fulfilled",
            Self::CategoriesRejected(_) => "catalog/categories_rejected",
            Self::CategoriesAbandoned => "catalog/categories_abandoned",
            Self::SelectCategory(_) => "catalog/select_category",
            Self::ClearErrors => "catalog/clear_errors",
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Cart slice actions.
///
/// None of these can fail: unknown ids and non-positive quantities degrade
/// to no-ops or removals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit, creating the line on first add.
    AddItem {
        /// Product being added.
        product_id: ProductId,
        /// Title captured at add time.
        title: String,
        /// Unit price captured at add time.
        price: Price,
        /// Image captured at add time.
        image: String,
    },
    /// Set a line's quantity exactly; `<= 0` removes the line.
    SetQuantity {
        /// Line to change.
        product_id: ProductId,
        /// New quantity, not a delta.
        quantity: i64,
    },
    /// Remove a line if present.
    RemoveItem(ProductId),
    /// Remove every line.
    Clear,
}

impl CartAction {
    /// Build an [`CartAction::AddItem`] capturing a product's current details.
    #[must_use]
    pub fn add(product: &Product) -> Self {
        Self::AddItem {
            product_id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }

    /// Stable name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddItem { .. } => "cart/add_item",
            Self::SetQuantity { .. } => "cart/set_quantity",
            Self::RemoveItem(_) => "cart/remove_item",
            Self::Clear => "cart/clear",
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Which explicit credential operation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOperation {
    /// Sign in to an existing account.
    SignIn,
    /// Create an account and sign in.
    SignUp,
}

/// Session slice actions.
///
/// `Credential*` and `SignedOut` belong to explicit, locally started
/// operations. `ExternalIdentityChanged` is the provider's push and only
/// ever touches the identity field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// A sign-in or sign-up started.
    CredentialRequested(CredentialOperation),
    /// The credential operation produced an identity.
    CredentialSucceeded(Identity),
    /// The credential operation failed with a displayable message.
    CredentialFailed(String),
    /// The credential operation was dropped before the provider answered.
    CredentialAbandoned,
    /// Local sign-out completed (whatever the provider answered).
    SignedOut,
    /// The provider pushed the current identity, or its absence.
    ExternalIdentityChanged(Option<Identity>),
    /// Forget the last credential error.
    ClearError,
}

impl SessionAction {
    /// Stable name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CredentialRequested(_) => "session/credential_requested",
            Self::CredentialSucceeded(_) => "session/credential_succeeded",
            Self::CredentialFailed(_) => "session/credential_failed",
            Self::CredentialAbandoned => "session/credential_abandoned",
            Self::SignedOut => "session/signed_out",
            Self::ExternalIdentityChanged(_) => "session/external_identity_changed",
            Self::ClearError => "session/clear_error",
        }
    }
}

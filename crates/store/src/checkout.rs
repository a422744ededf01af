//! Checkout: turn the current cart into an order confirmation.
//!
//! There is no payment step. A confirmed checkout clears the cart and
//! hands back what was bought.

use serde::Serialize;
use shopmall_core::{Email, Price};
use thiserror::Error;

use crate::action::CartAction;
use crate::selectors;
use crate::store::Store;
use crate::telemetry;

/// Reasons a checkout does not go through.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("sign in to check out")]
    NotAuthenticated,
    #[error("the cart is empty")]
    EmptyCart,
    #[error("checkout was not confirmed")]
    Declined,
}

/// What a checkout covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    /// Email of the signed-in identity.
    pub email: Email,
    /// Total units across all lines.
    pub item_count: u64,
    /// Cart total.
    pub total: Price,
}

/// Check out the current cart.
///
/// `confirm` sees the summary and decides whether to proceed. On
/// confirmation the cart is cleared and the summary returned.
///
/// # Errors
///
/// Returns [`CheckoutError::NotAuthenticated`] when nobody is signed in,
/// [`CheckoutError::EmptyCart`] when there is nothing to buy, and
/// [`CheckoutError::Declined`] when `confirm` returns `false`. The cart is
/// untouched in every error case.
pub fn checkout<F>(store: &Store, confirm: F) -> Result<CheckoutSummary, CheckoutError>
where
    F: FnOnce(&CheckoutSummary) -> bool,
{
    let state = store.state();

    let email = selectors::current_email(&state)
        .cloned()
        .ok_or(CheckoutError::NotAuthenticated)?;
    if state.cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let summary = CheckoutSummary {
        email,
        item_count: selectors::cart_item_count(&state),
        total: selectors::cart_total(&state),
    };

    if !confirm(&summary) {
        tracing::debug!("Checkout declined");
        return Err(CheckoutError::Declined);
    }

    store.dispatch(CartAction::Clear);

    let items = summary.item_count.to_string();
    let total = summary.total.display();
    telemetry::add_breadcrumb(
        "checkout",
        "checkout confirmed",
        Some(&[("items", items.as_str()), ("total", total.as_str())]),
    );
    tracing::info!(items = summary.item_count, total = %summary.total, "Checkout completed");

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use shopmall_core::{Identity, ProductId};

    use super::*;
    use crate::action::SessionAction;

    fn add_mug(store: &Store) {
        store.dispatch(CartAction::AddItem {
            product_id: ProductId::new(4),
            title: "Coffee Mug".to_string(),
            price: Price::from_cents(1299),
            image: String::new(),
        });
    }

    fn sign_in(store: &Store) {
        store.dispatch(SessionAction::CredentialSucceeded(Identity::new(
            "u1",
            Email::parse("test@test.com").unwrap(),
            Utc::now(),
        )));
    }

    #[test]
    fn test_anonymous_is_refused() {
        let store = Store::new();
        add_mug(&store);
        assert_eq!(
            checkout(&store, |_| true),
            Err(CheckoutError::NotAuthenticated)
        );
        assert!(!store.state().cart.is_empty());
    }

    #[test]
    fn test_empty_cart_is_refused() {
        let store = Store::new();
        sign_in(&store);
        assert_eq!(checkout(&store, |_| true), Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_declined_keeps_cart() {
        let store = Store::new();
        sign_in(&store);
        add_mug(&store);
        assert_eq!(checkout(&store, |_| false), Err(CheckoutError::Declined));
        assert_eq!(store.state().cart.lines().len(), 1);
    }

    #[test]
    fn test_confirmed_clears_cart() {
        let store = Store::new();
        sign_in(&store);
        add_mug(&store);
        add_mug(&store);

        let summary = checkout(&store, |summary| summary.item_count == 2).unwrap();
        assert_eq!(summary.email.as_str(), "test@test.com");
        assert_eq!(summary.total, Price::from_cents(2598));

        let state = store.state();
        assert!(state.cart.is_empty());
        assert_eq!(state.cart.total(), Price::ZERO);
        assert!(state.session.identity().is_some());
    }
}

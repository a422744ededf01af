//! Scripted end-to-end session.
//!
//! Browses the catalog, fills the cart, signs in with a demo account,
//! checks out and signs out again, printing each step.

use secrecy::SecretString;
use shopmall_store::session::DEMO_ACCOUNTS;
use shopmall_store::{checkout, selectors};

use super::{CommandError, Context, print_cart, print_products, print_session};

/// Run the scripted session.
///
/// # Errors
///
/// Returns an error if the demo sign-in or the checkout fails.
#[allow(clippy::print_stdout)]
pub async fn run(ctx: &Context, category: &str, items: usize) -> Result<(), CommandError> {
    let _trace = ctx.store.subscribe(|state| {
        tracing::debug!(
            version = state.version,
            cart_items = selectors::cart_item_count(state),
            signed_in = selectors::is_authenticated(state),
            "State changed"
        );
    });
    let forwarder = ctx.session.attach();

    println!("== Browse");
    ctx.load_catalog().await;
    ctx.catalog.select_category(category);
    print_products(&ctx.store.state());

    println!();
    println!("== Add to cart");
    let picked: Vec<_> = ctx.catalog.visible_products().into_iter().take(items).collect();
    for product in &picked {
        ctx.cart.add_product(product);
    }
    if let Some(first) = picked.first() {
        ctx.cart.add_product(first);
    }
    print_cart(&ctx.store.state());

    println!();
    println!("== Sign in");
    let (email, password) = DEMO_ACCOUNTS[1];
    let identity = ctx
        .session
        .sign_in(email, &SecretString::from(password))
        .await;
    print_session(&ctx.store.state());
    if identity.is_none() {
        forwarder.abort();
        return Err(CommandError::Auth(email.to_string()));
    }

    println!();
    println!("== Checkout");
    let result = checkout(&ctx.store, |summary| {
        println!(
            "Confirming {} items for {} ({})",
            summary.item_count,
            summary.email,
            summary.total.display()
        );
        true
    });
    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            forwarder.abort();
            return Err(e.into());
        }
    };
    println!("Order placed: {} items, {}", summary.item_count, summary.total.display());
    print_cart(&ctx.store.state());

    println!();
    println!("== Sign out");
    ctx.session.sign_out().await;
    print_session(&ctx.store.state());

    forwarder.abort();
    Ok(())
}

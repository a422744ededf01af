//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! shopmall catalog --category home
//! shopmall --offline product 4
//! ```

use shopmall_core::ProductId;
use shopmall_store::{CatalogError, selectors};

use super::{CommandError, Context, print_product, print_products};

/// Load the catalog and list the products in `category`.
///
/// # Errors
///
/// Never fails on fetch errors; the bundled catalog is listed instead.
pub async fn list(ctx: &Context, category: &str) -> Result<(), CommandError> {
    ctx.load_catalog().await;
    ctx.catalog.select_category(category);

    print_products(&ctx.store.state());
    Ok(())
}

/// Fetch and print one product.
///
/// Offline, the product is looked up in the bundled catalog.
///
/// # Errors
///
/// Returns [`CatalogError::NotFound`] for unknown ids and the fetch error
/// otherwise.
pub async fn show(ctx: &Context, id: i32) -> Result<(), CommandError> {
    let id = ProductId::new(id);

    let product = if ctx.offline {
        selectors::product_by_id(&ctx.store.state(), id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))?
    } else {
        ctx.catalog.load_product(id).await?
    };

    print_product(&product);
    Ok(())
}

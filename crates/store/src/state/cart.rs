//! Cart ledger slice.

use serde::Serialize;
use shopmall_core::{Price, ProductId};

use crate::action::CartAction;

/// One product in the cart.
///
/// Title, price and image are captured when the product is first added and
/// do not follow later catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    /// Product this line is for; unique within the cart.
    pub product_id: ProductId,
    /// Title at add time.
    pub title: String,
    /// Unit price at add time.
    pub price: Price,
    /// Image at add time.
    pub image: String,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Cart lines plus their total.
///
/// Fields are private so the total can only be produced by [`CartState::reduce`],
/// which recomputes it from the remaining lines after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CartState {
    lines: Vec<CartLine>,
    total: Price,
}

impl CartState {
    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for `product_id`, if any.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Apply a cart action, returning the next state.
    #[must_use]
    pub fn reduce(&self, action: CartAction) -> Self {
        let mut lines = self.lines.clone();

        match action {
            CartAction::AddItem {
                product_id,
                title,
                price,
                image,
            } => {
                if let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id) {
                    line.quantity = line.quantity.saturating_add(1);
                } else {
                    lines.push(CartLine {
                        product_id,
                        title,
                        price,
                        image,
                        quantity: 1,
                    });
                }
            }
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => match u32::try_from(quantity) {
                Ok(quantity) if quantity > 0 => {
                    if let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id) {
                        line.quantity = quantity;
                    }
                }
                // Quantities above u32::MAX clamp instead of removing the line.
                Err(_) if quantity > 0 => {
                    if let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id) {
                        line.quantity = u32::MAX;
                    }
                }
                _ => lines.retain(|l| l.product_id != product_id),
            },
            CartAction::RemoveItem(product_id) => {
                lines.retain(|l| l.product_id != product_id);
            }
            CartAction::Clear => lines.clear(),
        }

        Self::from_lines(lines)
    }

    fn from_lines(lines: Vec<CartLine>) -> Self {
        let total = lines.iter().map(CartLine::line_total).sum();
        Self { lines, total }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;

    fn add(id: i32, title: &str, cents: u32) -> CartAction {
        CartAction::AddItem {
            product_id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(cents),
            image: format!("https://img.example/{id}.jpg"),
        }
    }

    fn set(id: i32, quantity: i64) -> CartAction {
        CartAction::SetQuantity {
            product_id: ProductId::new(id),
            quantity,
        }
    }

    fn exact_sum(cart: &CartState) -> Decimal {
        cart.lines()
            .iter()
            .map(|l| l.price.amount() * Decimal::from(l.quantity))
            .sum()
    }

    #[test]
    fn test_mug_scenario() {
        let cart = CartState::default().reduce(add(1, "Mug", 1299));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 1);
        assert_eq!(cart.total().amount(), Decimal::new(1299, 2));

        let cart = cart.reduce(add(1, "Mug", 1299));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 2);
        assert_eq!(cart.total().amount(), Decimal::new(2598, 2));

        let cart = cart.reduce(set(1, 0));
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_add_twice_is_one_line() {
        let cart = CartState::default()
            .reduce(add(7, "Shoes", 8999))
            .reduce(add(7, "Shoes", 8999));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_add_keeps_captured_details() {
        let cart = CartState::default()
            .reduce(add(1, "Mug", 1299))
            .reduce(add(1, "Renamed Mug", 9999));
        let line = cart.line(ProductId::new(1)).unwrap();
        assert_eq!(line.title, "Mug");
        assert_eq!(line.price, Price::from_cents(1299));
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_set_quantity_is_absolute() {
        let cart = CartState::default()
            .reduce(add(1, "Mug", 1299))
            .reduce(set(1, 5))
            .reduce(set(1, 3));
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 3);
        assert_eq!(cart.total().amount(), Decimal::new(3897, 2));
    }

    #[test]
    fn test_non_positive_quantity_equals_remove() {
        let base = CartState::default()
            .reduce(add(1, "Mug", 1299))
            .reduce(add(2, "Case", 1599));

        for quantity in [0, -1, i64::MIN] {
            assert_eq!(
                base.reduce(set(1, quantity)),
                base.reduce(CartAction::RemoveItem(ProductId::new(1)))
            );
        }
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let base = CartState::default().reduce(add(1, "Mug", 1299));
        assert_eq!(base.reduce(set(99, 4)), base);
        assert_eq!(base.reduce(set(99, 0)), base);
        assert_eq!(base.reduce(CartAction::RemoveItem(ProductId::new(99))), base);
    }

    #[test]
    fn test_huge_quantity_clamps() {
        let cart = CartState::default()
            .reduce(add(1, "Mug", 1))
            .reduce(set(1, i64::MAX));
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_clear() {
        let cart = CartState::default()
            .reduce(add(1, "Mug", 1299))
            .reduce(add(2, "Case", 1599))
            .reduce(CartAction::Clear);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    fn arb_action() -> impl Strategy<Value = CartAction> {
        prop_oneof![
            2 => (0_i32..6, 0_u32..10_000).prop_map(|(id, cents)| add(id, "item", cents)),
            1 => (0_i32..6, -2_i64..5).prop_map(|(id, quantity)| set(id, quantity)),
            1 => (0_i32..6).prop_map(|id| CartAction::RemoveItem(ProductId::new(id))),
        ]
    }

    proptest! {
        #[test]
        fn test_total_matches_exact_sum_after_every_mutation(
            actions in prop::collection::vec(arb_action(), 0..300)
        ) {
            let mut cart = CartState::default();
            for action in actions {
                cart = cart.reduce(action);

                prop_assert_eq!(cart.total().amount(), exact_sum(&cart));
                prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));
                let mut ids: Vec<_> = cart.lines().iter().map(|l| l.product_id).collect();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), cart.lines().len());
            }
        }
    }
}

//! Catalog product records.
//!
//! Field names follow the FakeStore-compatible catalog service so a
//! product list can be deserialized straight from the wire.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Customer rating summary for a product.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating, 0 to 5.
    pub rate: f64,
    /// Number of ratings.
    pub count: u32,
}

/// A catalog product.
///
/// Immutable once fetched: a new catalog snapshot replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique within a catalog snapshot.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Category label (see [`CategoryFilter`](super::CategoryFilter)).
    pub category: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Rating summary.
    #[serde(default)]
    pub rating: Rating,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_payload() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://example.com/81fPKd-2AYL.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(10995));
        assert_eq!(product.category, "men's clothing");
        assert_eq!(product.rating.count, 120);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id": 2, "title": "Mug", "price": "12.99", "category": "home"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.description.is_empty());
        assert_eq!(product.rating, Rating::default());
    }

    #[test]
    fn test_negative_price_rejected() {
        let json = r#"{"id": 3, "title": "Bad", "price": -1, "category": "home"}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}

//! Bundled catalog shown before, or instead of, a successful fetch.

use shopmall_core::{Price, Product, ProductId, Rating};

/// Categories shipped with the app.
pub const CATEGORIES: [&str; 5] = ["accessories", "electronics", "clothing", "home", "sports"];

struct Seed {
    id: i32,
    title: &'static str,
    cents: u32,
    description: &'static str,
    category: &'static str,
    image: &'static str,
    rate: f64,
    count: u32,
}

const SEEDS: [Seed; 6] = [
    Seed {
        id: 1,
        title: "Stylish Backpack",
        cents: 2999,
        description: "A comfortable and stylish backpack for everyday use",
        category: "accessories",
        image: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=300&h=300&fit=crop",
        rate: 4.5,
        count: 124,
    },
    Seed {
        id: 2,
        title: "Wireless Headphones",
        cents: 7999,
        description: "High-quality wireless headphones with noise cancellation",
        category: "electronics",
        image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=300&h=300&fit=crop",
        rate: 4.3,
        count: 89,
    },
    Seed {
        id: 3,
        title: "Cotton T-Shirt",
        cents: 1999,
        description: "Comfortable 100% cotton t-shirt in various colors",
        category: "clothing",
        image: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=300&h=300&fit=crop",
        rate: 4.7,
        count: 256,
    },
    Seed {
        id: 4,
        title: "Coffee Mug",
        cents: 1299,
        description: "Ceramic coffee mug with ergonomic handle",
        category: "home",
        image: "https://images.unsplash.com/photo-1514228742587-6b1558fcf93a?w=300&h=300&fit=crop",
        rate: 4.2,
        count: 67,
    },
    Seed {
        id: 5,
        title: "Running Shoes",
        cents: 8999,
        description: "Lightweight running shoes with excellent cushioning",
        category: "sports",
        image: "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=300&h=300&fit=crop",
        rate: 4.6,
        count: 178,
    },
    Seed {
        id: 6,
        title: "Smartphone Case",
        cents: 1599,
        description: "Protective case for smartphones with drop protection",
        category: "accessories",
        image: "https://images.unsplash.com/photo-1601593346740-925612772716?w=300&h=300&fit=crop",
        rate: 4.1,
        count: 92,
    },
];

/// Products shipped with the app.
#[must_use]
pub fn products() -> Vec<Product> {
    SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId::new(seed.id),
            title: seed.title.to_string(),
            price: Price::from_cents(seed.cents),
            description: seed.description.to_string(),
            category: seed.category.to_string(),
            image: seed.image.to_string(),
            rating: Rating {
                rate: seed.rate,
                count: seed.count,
            },
        })
        .collect()
}

/// Categories shipped with the app, as owned labels.
#[must_use]
pub fn categories() -> Vec<String> {
    CATEGORIES.iter().map(ToString::to_string).collect()
}

//! Core types for ShopMall.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod identity;
pub mod price;
pub mod product;

pub use category::CategoryFilter;
pub use email::{Email, EmailError};
pub use id::*;
pub use identity::{Identity, IdentityMetadata};
pub use price::{Price, PriceError};
pub use product::{Product, Rating};

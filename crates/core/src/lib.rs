//! ShopMall Core - Shared domain types.
//!
//! This crate provides the types shared by the ShopMall components:
//! - `store` - Reactive client state store (catalog, cart, session)
//! - `cli` - Command-line view over the store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! async runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, emails, plus the
//!   catalog and identity records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! `mayab-products` — product reference data.
//!
//! Products are read-mostly from the order core's point of view: orders
//! snapshot what they need at creation time.

pub mod product;

pub use product::{boxes_needed, BoxType, Product, ProductId};

//! Products as seen by the cart.
//!
//! Only salable products can be put in a cart; their customer taxes drive the
//! tax-inclusive amounts.

pub mod product;

pub use product::Product;

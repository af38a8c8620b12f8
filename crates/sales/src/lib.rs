//! Sale orders as produced from carts.
//!
//! The sale-order lifecycle is owned by the surrounding ERP. This crate holds
//! the unsaved skeleton the cart fills in, the explicit set of fields a caller
//! may override on it, and the service contract used to build and save it.

pub mod order;
pub mod service;

pub use order::{Sale, SaleLine, SaleOverrides};
pub use service::{PersistenceError, SaleOrderService};

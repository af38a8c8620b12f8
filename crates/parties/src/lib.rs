//! Parties (customers) as seen by the cart.
//!
//! Parties are owned by the surrounding ERP; this crate only carries the
//! fields the cart reads when pricing and taxing a line.

pub mod party;

pub use party::Party;

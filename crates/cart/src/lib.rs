//! Sale cart: draft purchase lines priced and taxed on the fly, converted in
//! batches into sale orders grouped by customer.
//!
//! - [`CartManager`] owns cart lines and their derived amounts.
//! - [`CartToSale`] turns a selection of lines into sale orders.
//! - [`CreateSaleAction`] is the entry point used by a "create sale" button.
//!
//! Everything the cart does not own (records, prices, taxes, sale orders) is
//! reached through the traits in [`services`] and [`store`].

pub mod action;
pub mod config;
pub mod context;
pub mod converter;
pub mod line;
pub mod manager;
pub mod services;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use action::{CreateSaleAction, SaleListFilter};
pub use config::{CartConfig, ConfigError, SaveFailurePolicy};
pub use context::{Company, SessionContext, Shop, User};
pub use converter::{CartToSale, SaleConversion};
pub use line::{CartLine, CartLineState, QUANTITY_DIGITS};
pub use manager::{CartManager, PriceWithTax, PriceWithTaxField};
pub use services::{Directory, PriceContext, PricingService, TaxLine, TaxRulePattern, TaxService};
pub use store::{CartStore, InMemoryCartStore};

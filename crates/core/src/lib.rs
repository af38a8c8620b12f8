//! `salecart-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the cart, sales,
//! party and product crates (no infrastructure concerns).

pub mod currency;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use currency::Currency;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    CartLineId, CompanyId, CurrencyId, PartyId, PriceListId, ProductId, SaleId, ShopId, TaxId,
    TaxRuleId, UserId,
};
pub use value_object::ValueObject;

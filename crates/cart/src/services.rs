//! Contracts for the ERP services the cart calls into.
//!
//! All calls are synchronous and uncached: every recomputation asks again.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salecart_core::{
    CompanyId, Currency, CurrencyId, DomainResult, PartyId, PriceListId, ProductId, ShopId,
    TaxId, TaxRuleId, UserId, ValueObject,
};
use salecart_parties::Party;
use salecart_products::Product;

use crate::context::{Company, Shop, User};

/// Read access to the reference records a cart line points at.
///
/// Lookups of unknown ids fail with `DomainError::NotFound`.
pub trait Directory: Send + Sync {
    fn party(&self, id: PartyId) -> DomainResult<Party>;
    fn product(&self, id: ProductId) -> DomainResult<Product>;
    fn currency(&self, id: CurrencyId) -> DomainResult<Currency>;
    fn shop(&self, id: ShopId) -> DomainResult<Shop>;
    fn company(&self, id: CompanyId) -> DomainResult<Company>;
    fn user(&self, id: UserId) -> DomainResult<User>;
}

/// Pricing inputs: who buys, under which price list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceContext {
    pub customer: Option<PartyId>,
    pub price_list: Option<PriceListId>,
}

impl ValueObject for PriceContext {}

pub trait PricingService: Send + Sync {
    /// Unit sale price per product for `quantity` units under `context`.
    fn sale_prices(
        &self,
        products: &[ProductId],
        quantity: Decimal,
        context: &PriceContext,
    ) -> DomainResult<HashMap<ProductId, Decimal>>;
}

/// One computed tax amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLine {
    pub tax: TaxId,
    pub base: Decimal,
    pub amount: Decimal,
}

impl ValueObject for TaxLine {}

/// Criteria a customer tax rule is matched against. The cart always passes
/// an empty pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRulePattern(BTreeMap<String, String>);

impl ValueObject for TaxRulePattern {}

impl TaxRulePattern {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub trait TaxService: Send + Sync {
    /// Tax amounts of `taxes` applied to `quantity` units at `unit_price`.
    fn compute(
        &self,
        taxes: &[TaxId],
        unit_price: Decimal,
        quantity: Decimal,
    ) -> DomainResult<Vec<TaxLine>>;

    /// Taxes that replace `tax` under the customer tax `rule`.
    ///
    /// An empty result means the rule does not rewrite `tax`.
    fn apply_customer_tax_rule(
        &self,
        rule: TaxRuleId,
        tax: TaxId,
        pattern: &TaxRulePattern,
    ) -> DomainResult<Vec<TaxId>>;
}

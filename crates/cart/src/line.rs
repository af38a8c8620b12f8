use core::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salecart_core::{CartLineId, CurrencyId, DomainError, DomainResult, PartyId, ProductId, ShopId};

/// Decimal places allowed on cart quantities.
pub const QUANTITY_DIGITS: u32 = 2;

/// Cart line lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartLineState {
    #[default]
    Draft,
    #[serde(rename = "wait")]
    Waiting,
    Done,
}

impl core::fmt::Display for CartLineState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            CartLineState::Draft => "draft",
            CartLineState::Waiting => "wait",
            CartLineState::Done => "done",
        })
    }
}

/// One pending purchase: product, quantity and price for a customer.
///
/// Only draft lines can be edited. Edits go through
/// [`CartManager`](crate::CartManager) so prices follow product and quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    id: CartLineId,
    shop: ShopId,
    cart_date: NaiveDate,
    party: Option<PartyId>,
    quantity: Decimal,
    product: Option<ProductId>,
    unit_price: Option<Decimal>,
    currency: Option<CurrencyId>,
    state: CartLineState,
}

impl CartLine {
    /// Draft line for one unit of nothing yet.
    pub fn new(id: CartLineId, shop: ShopId, cart_date: NaiveDate) -> Self {
        Self {
            id,
            shop,
            cart_date,
            party: None,
            quantity: Decimal::ONE,
            product: None,
            unit_price: None,
            currency: None,
            state: CartLineState::Draft,
        }
    }

    pub fn id(&self) -> CartLineId {
        self.id
    }

    pub fn shop(&self) -> ShopId {
        self.shop
    }

    pub fn cart_date(&self) -> NaiveDate {
        self.cart_date
    }

    pub fn party(&self) -> Option<PartyId> {
        self.party
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn product(&self) -> Option<ProductId> {
        self.product
    }

    pub fn unit_price(&self) -> Option<Decimal> {
        self.unit_price
    }

    pub fn currency(&self) -> Option<CurrencyId> {
        self.currency
    }

    pub fn state(&self) -> CartLineState {
        self.state
    }

    pub fn is_draft(&self) -> bool {
        self.state == CartLineState::Draft
    }

    pub fn is_done(&self) -> bool {
        self.state == CartLineState::Done
    }

    /// Non-draft lines are read-only.
    pub fn ensure_draft(&self) -> DomainResult<()> {
        if self.is_draft() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "cart line {} is {} and can no longer be edited",
                self.id, self.state
            )))
        }
    }

    /// Record-store hook for state writes; cart code moves lines to done
    /// through the converter only.
    pub fn set_state(&mut self, state: CartLineState) {
        self.state = state;
    }

    /// Listing order: newest date first, then newest line first.
    pub fn listing_order(a: &CartLine, b: &CartLine) -> Ordering {
        b.cart_date.cmp(&a.cart_date).then_with(|| b.id.cmp(&a.id))
    }

    pub(crate) fn set_party(&mut self, party: Option<PartyId>) -> DomainResult<()> {
        self.ensure_draft()?;
        self.party = party;
        Ok(())
    }

    pub(crate) fn set_product(&mut self, product: Option<ProductId>) -> DomainResult<()> {
        self.ensure_draft()?;
        self.product = product;
        Ok(())
    }

    pub(crate) fn set_quantity(&mut self, quantity: Decimal) -> DomainResult<()> {
        self.ensure_draft()?;
        if quantity < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "quantity {quantity} must not be negative"
            )));
        }
        if quantity.round_dp(QUANTITY_DIGITS) != quantity {
            return Err(DomainError::validation(format!(
                "quantity {quantity} has more than {QUANTITY_DIGITS} decimals"
            )));
        }
        self.quantity = quantity;
        Ok(())
    }

    pub(crate) fn set_unit_price(&mut self, unit_price: Option<Decimal>) -> DomainResult<()> {
        self.ensure_draft()?;
        self.unit_price = unit_price;
        Ok(())
    }

    pub(crate) fn set_currency(&mut self, currency: Option<CurrencyId>) -> DomainResult<()> {
        self.ensure_draft()?;
        self.currency = currency;
        Ok(())
    }
}

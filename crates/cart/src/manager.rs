//! Cart Entity Manager: cart line defaults, edits and derived amounts.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salecart_core::currency::{DEFAULT_DIGITS, round_to_digits};
use salecart_core::{
    CartLineId, CurrencyId, DomainError, DomainResult, Entity, PartyId, ProductId, ShopId, TaxId,
};

use crate::config::CartConfig;
use crate::context::SessionContext;
use crate::line::{CartLine, CartLineState};
use crate::services::{Directory, PriceContext, PricingService, TaxRulePattern, TaxService};
use crate::store::CartStore;

/// Tax-inclusive values that [`CartManager::price_with_tax`] can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceWithTaxField {
    AmountWithTax,
    UnitPriceWithTax,
}

/// Requested field → line → value.
pub type PriceWithTax = BTreeMap<PriceWithTaxField, BTreeMap<CartLineId, Decimal>>;

/// Owns cart lines: defaults, draft-only edits with price lookup, derived
/// amounts and deletion.
pub struct CartManager {
    config: CartConfig,
    store: Arc<dyn CartStore>,
    directory: Arc<dyn Directory>,
    pricing: Arc<dyn PricingService>,
    taxes: Arc<dyn TaxService>,
}

impl core::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CartManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CartManager {
    pub fn new(
        config: CartConfig,
        store: Arc<dyn CartStore>,
        directory: Arc<dyn Directory>,
        pricing: Arc<dyn PricingService>,
        taxes: Arc<dyn TaxService>,
    ) -> Self {
        Self {
            config,
            store,
            directory,
            pricing,
            taxes,
        }
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CartStore> {
        &self.store
    }

    pub fn directory(&self) -> &Arc<dyn Directory> {
        &self.directory
    }

    // ---------------------------------------------------------------------
    // Defaults
    // ---------------------------------------------------------------------

    /// The shop the current user sells from.
    pub fn default_shop(&self, session: &SessionContext) -> DomainResult<Option<ShopId>> {
        Ok(self.directory.user(session.user())?.shop)
    }

    /// Shop e-sale currency when configured, otherwise the company currency.
    pub fn default_currency(&self, session: &SessionContext) -> DomainResult<Option<CurrencyId>> {
        if let Some(shop) = session.shop() {
            if let Some(currency) = self.directory.shop(shop)?.esale_currency {
                return Ok(Some(currency));
            }
        }
        match session.company() {
            Some(company) => Ok(Some(self.directory.company(company)?.currency)),
            None => Ok(None),
        }
    }

    /// Unsaved draft line with today's date, one unit, and the session's shop
    /// and currency.
    pub fn new_line(&self, session: &SessionContext) -> DomainResult<CartLine> {
        let shop = self.default_shop(session)?.ok_or_else(|| {
            DomainError::validation(format!("user {} has no shop to sell from", session.user()))
        })?;
        let mut line = CartLine::new(CartLineId::new(), shop, session.today());
        line.set_currency(self.default_currency(session)?)?;
        Ok(line)
    }

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    pub fn create(&self, line: CartLine) -> DomainResult<CartLine> {
        self.validate_required(&line)?;
        let line = self.store.create(line)?;
        tracing::info!(cart_line = %line.id(), "cart line created");
        Ok(line)
    }

    /// Persist edits of a line that is still a draft in the store.
    pub fn save(&self, line: &CartLine) -> DomainResult<()> {
        self.store.get(line.id())?.ensure_draft()?;
        line.ensure_draft()?;
        self.validate_required(line)?;
        self.store.save(line)
    }

    /// Delete lines, refusing the whole batch if any of them is done.
    #[tracing::instrument(skip(self, ids), fields(count = ids.len()), err)]
    pub fn delete(&self, ids: &[CartLineId]) -> DomainResult<()> {
        let lines = self.store.browse(ids)?;
        if let Some(done) = lines.iter().find(|line| line.is_done()) {
            let party = match done.party() {
                Some(party) => self.directory.party(party)?.rec_name(),
                None => String::new(),
            };
            let product = self.rec_name(done)?;
            tracing::warn!(cart_line = %done.id(), "refusing to delete done cart line");
            return Err(DomainError::precondition(format!(
                "Cart \"{party} - {product}\" ({}) is done. Can not delete.",
                done.id()
            )));
        }
        self.store.delete(ids)?;
        tracing::info!(count = ids.len(), "cart lines deleted");
        Ok(())
    }

    pub(crate) fn mark_done(&self, ids: &[CartLineId]) -> DomainResult<()> {
        self.store.write_state(ids, CartLineState::Done)
    }

    fn validate_required(&self, line: &CartLine) -> DomainResult<()> {
        let product = line.product().ok_or_else(|| {
            DomainError::validation(format!("cart line {} needs a product", line.id()))
        })?;
        if !self.directory.product(product)?.salable {
            return Err(DomainError::validation(format!(
                "product {product} is not salable"
            )));
        }
        if line.unit_price().is_none() {
            return Err(DomainError::validation(format!(
                "cart line {} needs a unit price",
                line.id()
            )));
        }
        if line.currency().is_none() {
            return Err(DomainError::validation(format!(
                "cart line {} needs a currency",
                line.id()
            )));
        }
        Ok(())
    }

    /// The product's record name, empty without a product.
    pub fn rec_name(&self, line: &CartLine) -> DomainResult<String> {
        match line.product() {
            Some(product) => Ok(self.directory.product(product)?.rec_name()),
            None => Ok(String::new()),
        }
    }

    // ---------------------------------------------------------------------
    // Edits
    // ---------------------------------------------------------------------

    /// Change the product and look its price up again.
    pub fn set_product(
        &self,
        line: &mut CartLine,
        product: Option<ProductId>,
        session: &SessionContext,
    ) -> DomainResult<()> {
        if let Some(product) = product {
            if !self.directory.product(product)?.salable {
                return Err(DomainError::validation(format!(
                    "product {product} is not salable"
                )));
            }
        }
        line.set_product(product)?;
        self.recompute_price(line, session)
    }

    /// Change the quantity and look the price up again (quantity breaks).
    pub fn set_quantity(
        &self,
        line: &mut CartLine,
        quantity: Decimal,
        session: &SessionContext,
    ) -> DomainResult<()> {
        line.set_quantity(quantity)?;
        self.recompute_price(line, session)
    }

    pub fn set_party(&self, line: &mut CartLine, party: Option<PartyId>) -> DomainResult<()> {
        if let Some(party) = party {
            self.directory.party(party)?;
        }
        line.set_party(party)
    }

    /// Manual price; must fit the configured price digits.
    pub fn set_unit_price(&self, line: &mut CartLine, unit_price: Option<Decimal>) -> DomainResult<()> {
        if let Some(price) = unit_price {
            if price.round_dp(self.config.price_digits) != price {
                return Err(DomainError::validation(format!(
                    "unit price {price} has more than {} decimals",
                    self.config.price_digits
                )));
            }
        }
        line.set_unit_price(unit_price)
    }

    pub fn set_currency(&self, line: &mut CartLine, currency: Option<CurrencyId>) -> DomainResult<()> {
        if let Some(currency) = currency {
            self.directory.currency(currency)?;
        }
        line.set_currency(currency)
    }

    // ---------------------------------------------------------------------
    // Pricing
    // ---------------------------------------------------------------------

    /// Customer, and the customer's price list falling back to the price
    /// list of the user's shop.
    pub fn sale_price_context(
        &self,
        line: &CartLine,
        session: &SessionContext,
    ) -> DomainResult<PriceContext> {
        let party_price_list = match line.party() {
            Some(party) => self.directory.party(party)?.sale_price_list,
            None => None,
        };
        let price_list = match party_price_list {
            Some(price_list) => Some(price_list),
            None => match self.default_shop(session)? {
                Some(shop) => self.directory.shop(shop)?.price_list,
                None => None,
            },
        };
        Ok(PriceContext {
            customer: line.party(),
            price_list,
        })
    }

    /// Refresh `unit_price` from the pricing service; no-op without a
    /// product. Does not persist.
    pub fn recompute_price(&self, line: &mut CartLine, session: &SessionContext) -> DomainResult<()> {
        let Some(product) = line.product() else {
            return Ok(());
        };
        let context = self.sale_price_context(line, session)?;
        let prices = self
            .pricing
            .sale_prices(&[product], line.quantity(), &context)?;
        let price = prices
            .get(&product)
            .copied()
            .ok_or_else(|| DomainError::not_found(format!("sale price of product {product}")))?;
        let price = round_to_digits(price, self.config.price_digits);
        tracing::debug!(cart_line = %line.id(), %product, %price, "unit price recomputed");
        line.set_unit_price(Some(price))
    }

    // ---------------------------------------------------------------------
    // Derived amounts
    // ---------------------------------------------------------------------

    /// Display precision of the line's currency.
    pub fn currency_digits(&self, line: &CartLine) -> DomainResult<u32> {
        match line.currency() {
            Some(currency) => Ok(self.directory.currency(currency)?.digits),
            None => Ok(DEFAULT_DIGITS),
        }
    }

    fn round(&self, line: &CartLine, amount: Decimal) -> DomainResult<Decimal> {
        match line.currency() {
            Some(currency) => Ok(self.directory.currency(currency)?.round(amount)),
            None => Ok(round_to_digits(amount, DEFAULT_DIGITS)),
        }
    }

    /// `quantity × unit_price` in the line's currency; zero when either is
    /// missing or zero.
    pub fn untaxed_amount(&self, line: &CartLine) -> DomainResult<Decimal> {
        match line.unit_price() {
            Some(price) if !price.is_zero() && !line.quantity().is_zero() => {
                let amount = line.quantity().checked_mul(price).ok_or_else(|| {
                    DomainError::validation(format!("cart line {} amount overflows", line.id()))
                })?;
                self.round(line, amount)
            }
            _ => Ok(Decimal::ZERO),
        }
    }

    /// Product customer taxes, rewritten by the party's customer tax rule.
    fn customer_taxes(&self, line: &CartLine, product: ProductId) -> DomainResult<Vec<TaxId>> {
        let taxes = self.directory.product(product)?.customer_taxes_used;
        if taxes.is_empty() {
            return Ok(taxes);
        }
        let Some(party) = line.party() else {
            return Ok(taxes);
        };
        let Some(rule) = self.directory.party(party)?.customer_tax_rule else {
            return Ok(taxes);
        };

        let pattern = TaxRulePattern::empty();
        let mut rewritten = Vec::new();
        for tax in &taxes {
            rewritten.extend(self.taxes.apply_customer_tax_rule(rule, *tax, &pattern)?);
        }
        if rewritten.is_empty() {
            Ok(taxes)
        } else {
            Ok(rewritten)
        }
    }

    /// (amount with tax, unit price with tax), both rounded in the line's
    /// currency.
    fn line_price_with_tax(&self, line: &CartLine) -> DomainResult<(Decimal, Decimal)> {
        let quantity = line.quantity();
        let untaxed = self.untaxed_amount(line)?;

        let (amount, unit_price) = match (line.product(), line.unit_price()) {
            (Some(product), Some(price))
                if !quantity.is_zero() && !price.is_zero() && !untaxed.is_zero() =>
            {
                let taxes = self.customer_taxes(line, product)?;
                let tax_amount: Decimal = self
                    .taxes
                    .compute(&taxes, price, quantity)?
                    .iter()
                    .map(|tax| tax.amount)
                    .sum();
                let amount = untaxed + tax_amount;
                let unit_price = amount.checked_div(quantity).ok_or_else(|| {
                    DomainError::validation(format!("cart line {} unit price overflows", line.id()))
                })?;
                (amount, unit_price)
            }
            _ => (Decimal::ZERO, Decimal::ZERO),
        };

        Ok((self.round(line, amount)?, self.round(line, unit_price)?))
    }

    /// Tax-inclusive amount and unit price of each line, restricted to the
    /// requested `fields`.
    #[tracing::instrument(skip(self, lines), fields(lines = lines.len()), err)]
    pub fn price_with_tax(
        &self,
        lines: &[CartLine],
        fields: &[PriceWithTaxField],
    ) -> DomainResult<PriceWithTax> {
        let mut amounts = BTreeMap::new();
        let mut unit_prices = BTreeMap::new();
        for line in lines {
            let (amount, unit_price) = self.line_price_with_tax(line)?;
            amounts.insert(line.id(), amount);
            unit_prices.insert(line.id(), unit_price);
        }

        let mut result = PriceWithTax::new();
        if fields.contains(&PriceWithTaxField::AmountWithTax) {
            result.insert(PriceWithTaxField::AmountWithTax, amounts);
        }
        if fields.contains(&PriceWithTaxField::UnitPriceWithTax) {
            result.insert(PriceWithTaxField::UnitPriceWithTax, unit_prices);
        }
        Ok(result)
    }

    pub fn amount_with_tax(&self, line: &CartLine) -> DomainResult<Decimal> {
        Ok(self.line_price_with_tax(line)?.0)
    }

    pub fn unit_price_with_tax(&self, line: &CartLine) -> DomainResult<Decimal> {
        Ok(self.line_price_with_tax(line)?.1)
    }
}

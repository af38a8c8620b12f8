//! Cart-to-Sale Converter: one sale order per customer from a batch of lines.

use std::sync::Arc;

use salecart_core::{CartLineId, DomainError, DomainResult, PartyId, SaleId};
use salecart_sales::{PersistenceError, Sale, SaleLine, SaleOrderService, SaleOverrides};

use crate::config::SaveFailurePolicy;
use crate::line::CartLine;
use crate::manager::CartManager;

/// Outcome of a conversion that got as far as saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleConversion {
    /// Saved sales, in first-seen party order. Empty when the save failed.
    pub sales: Vec<Sale>,
    /// Lines moved to done by this conversion.
    pub converted: Vec<CartLineId>,
    pub error: Option<PersistenceError>,
}

impl SaleConversion {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn sale_ids(&self) -> Vec<SaleId> {
        self.sales.iter().filter_map(|sale| sale.id).collect()
    }
}

pub struct CartToSale {
    manager: Arc<CartManager>,
    sales: Arc<dyn SaleOrderService>,
}

impl core::fmt::Debug for CartToSale {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CartToSale")
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}

impl CartToSale {
    pub fn new(manager: Arc<CartManager>, sales: Arc<dyn SaleOrderService>) -> Self {
        Self { manager, sales }
    }

    /// Convert the cart lines `ids` into sale orders, one per party.
    ///
    /// Lines are read from the cart store, so a line converted by an earlier
    /// call is seen as done and skipped. A line without party (or product)
    /// fails the whole call before any sale is built. A failed save is
    /// reported in [`SaleConversion::error`]; what happens to the lines then
    /// depends on [`SaveFailurePolicy`].
    #[tracing::instrument(skip(self, ids, overrides), fields(lines = ids.len()), err)]
    pub fn create_sale(
        &self,
        ids: &[CartLineId],
        overrides: &SaleOverrides,
    ) -> DomainResult<SaleConversion> {
        let lines = self.manager.store().browse(ids)?;
        let pending: Vec<&CartLine> = lines.iter().filter(|line| !line.is_done()).collect();
        let groups = group_by_party(&pending)?;
        let ids: Vec<CartLineId> = pending.iter().map(|line| line.id()).collect();

        let mut sales = Vec::with_capacity(groups.len());
        for (party, group) in &groups {
            sales.push(self.build_sale(*party, group, overrides)?);
        }

        if !sales.is_empty() {
            if let Err(error) = self.sales.save(&mut sales) {
                tracing::error!(%error, sales = sales.len(), "saving sales from cart failed");
                let converted = match self.manager.config().save_failure_policy {
                    SaveFailurePolicy::MarkDone => {
                        tracing::warn!(
                            lines = ids.len(),
                            "marking cart lines done although their sales were not saved"
                        );
                        self.manager.mark_done(&ids)?;
                        ids
                    }
                    SaveFailurePolicy::KeepState => Vec::new(),
                };
                return Ok(SaleConversion {
                    sales: Vec::new(),
                    converted,
                    error: Some(error),
                });
            }
        }

        self.manager.mark_done(&ids)?;
        tracing::info!(
            sales = sales.len(),
            lines = ids.len(),
            "cart lines converted to sales"
        );
        Ok(SaleConversion {
            sales,
            converted: ids,
            error: None,
        })
    }

    fn build_sale(
        &self,
        party: PartyId,
        lines: &[&CartLine],
        overrides: &SaleOverrides,
    ) -> DomainResult<Sale> {
        let mut sale = self.sales.new_sale_skeleton(party)?;
        overrides.apply_to(&mut sale);

        let mut sale_lines = Vec::with_capacity(lines.len());
        for line in lines {
            sale_lines.push(self.sale_line(&sale, line)?);
        }
        sale.lines = sale_lines;
        Ok(sale)
    }

    /// Sale line built by the sale-order service, priced as in the cart.
    fn sale_line(&self, sale: &Sale, line: &CartLine) -> DomainResult<SaleLine> {
        let product = line.product().ok_or_else(|| missing_product(line))?;
        let mut sale_line = self
            .sales
            .new_sale_line_from_cart(sale, product, line.quantity())?;
        sale_line.unit_price = line.unit_price();
        Ok(sale_line)
    }
}

fn missing_product(line: &CartLine) -> DomainError {
    DomainError::validation(format!("cart line {} has no product", line.id()))
}

/// Lines grouped by party, parties in first-seen order.
fn group_by_party<'a>(lines: &[&'a CartLine]) -> DomainResult<Vec<(PartyId, Vec<&'a CartLine>)>> {
    let mut groups: Vec<(PartyId, Vec<&'a CartLine>)> = Vec::new();
    for line in lines {
        let party = line.party().ok_or_else(|| {
            DomainError::validation(format!("Add a party in ID \"{}\" cart.", line.id()))
        })?;
        if line.product().is_none() {
            return Err(missing_product(line));
        }
        match groups.iter_mut().find(|(seen, _)| *seen == party) {
            Some((_, group)) => group.push(*line),
            None => groups.push((party, vec![*line])),
        }
    }
    Ok(groups)
}

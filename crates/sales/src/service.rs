use rust_decimal::Decimal;
use thiserror::Error;

use salecart_core::{DomainResult, PartyId, ProductId};

use crate::order::{Sale, SaleLine};

/// Failure reported by the sale-order store when saving a batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to save sales: {message}")]
pub struct PersistenceError {
    pub message: String,
}

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sale-order construction and persistence, provided by the ERP.
pub trait SaleOrderService: Send + Sync {
    /// Unsaved sale seeded with the party's defaults (addresses, terms...).
    fn new_sale_skeleton(&self, party: PartyId) -> DomainResult<Sale>;

    /// Sale line for `product` with unit and defaults derived for `sale`.
    fn new_sale_line_from_cart(
        &self,
        sale: &Sale,
        product: ProductId,
        quantity: Decimal,
    ) -> DomainResult<SaleLine>;

    /// Save every sale in one batch, assigning ids. All or nothing.
    fn save(&self, sales: &mut [Sale]) -> Result<(), PersistenceError>;
}

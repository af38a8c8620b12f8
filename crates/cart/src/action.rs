//! "Create sale" action: selected cart lines in, sale list filter out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use salecart_core::{CartLineId, DomainResult, SaleId};
use salecart_sales::{PersistenceError, SaleOverrides};

use crate::converter::CartToSale;

/// Which sales the caller's sale list should show after the action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleListFilter {
    pub sale_ids: Vec<SaleId>,
}

#[derive(Debug)]
pub struct CreateSaleAction {
    converter: Arc<CartToSale>,
}

impl CreateSaleAction {
    pub fn new(converter: Arc<CartToSale>) -> Self {
        Self { converter }
    }

    /// Convert the selected lines and return the filter for the new sales,
    /// together with the save error if the sales could not be stored.
    pub fn run(
        &self,
        selected: &[CartLineId],
    ) -> DomainResult<(SaleListFilter, Option<PersistenceError>)> {
        let conversion = self
            .converter
            .create_sale(selected, &SaleOverrides::default())?;
        let filter = SaleListFilter {
            sale_ids: conversion.sale_ids(),
        };
        Ok((filter, conversion.error))
    }
}

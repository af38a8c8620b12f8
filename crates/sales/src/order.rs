use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use salecart_core::{CurrencyId, PartyId, ProductId, SaleId, ShopId, ValueObject};

/// Sale order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product: ProductId,
    pub quantity: Decimal,
    /// Unit of measure the quantity is expressed in.
    pub unit: String,
    pub unit_price: Option<Decimal>,
    pub description: Option<String>,
}

/// Sale order skeleton; `id` stays `None` until the sale-order service saves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: Option<SaleId>,
    pub party: PartyId,
    pub shop: Option<ShopId>,
    pub currency: Option<CurrencyId>,
    pub sale_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub comment: Option<String>,
    pub lines: Vec<SaleLine>,
}

impl Sale {
    /// Empty skeleton for `party`.
    pub fn for_party(party: PartyId) -> Self {
        Self {
            id: None,
            party,
            shop: None,
            currency: None,
            sale_date: None,
            description: None,
            reference: None,
            comment: None,
            lines: Vec::new(),
        }
    }
}

/// Fields a caller may force on every sale built from a cart batch.
///
/// `None` leaves the value chosen by the sale-order service untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleOverrides {
    pub shop: Option<ShopId>,
    pub currency: Option<CurrencyId>,
    pub sale_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub comment: Option<String>,
}

impl ValueObject for SaleOverrides {}

impl SaleOverrides {
    /// Write every set field onto `sale`.
    pub fn apply_to(&self, sale: &mut Sale) {
        if let Some(shop) = self.shop {
            sale.shop = Some(shop);
        }
        if let Some(currency) = self.currency {
            sale.currency = Some(currency);
        }
        if let Some(sale_date) = self.sale_date {
            sale.sale_date = Some(sale_date);
        }
        if let Some(description) = &self.description {
            sale.description = Some(description.clone());
        }
        if let Some(reference) = &self.reference {
            sale.reference = Some(reference.clone());
        }
        if let Some(comment) = &self.comment {
            sale.comment = Some(comment.clone());
        }
    }
}

use serde::{Deserialize, Serialize};

use salecart_core::{Entity, PartyId, PriceListId, TaxRuleId};

/// Customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub name: String,
    pub code: Option<String>,
    /// Price list used for this customer instead of the shop's.
    pub sale_price_list: Option<PriceListId>,
    /// Rule rewriting product taxes for this customer.
    pub customer_tax_rule: Option<TaxRuleId>,
}

impl Party {
    pub fn new(id: PartyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: None,
            sale_price_list: None,
            customer_tax_rule: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_sale_price_list(mut self, price_list: PriceListId) -> Self {
        self.sale_price_list = Some(price_list);
        self
    }

    pub fn with_customer_tax_rule(mut self, rule: TaxRuleId) -> Self {
        self.customer_tax_rule = Some(rule);
        self
    }
}

impl Entity for Party {
    type Id = PartyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn rec_name(&self) -> String {
        match &self.code {
            Some(code) => format!("[{code}] {}", self.name),
            None => self.name.clone(),
        }
    }
}

use serde::{Deserialize, Serialize};

use salecart_core::{Entity, ProductId, TaxId};

/// Product variant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub code: Option<String>,
    pub name: String,
    pub salable: bool,
    /// Default sale unit of measure (e.g. "unit", "kg").
    pub sale_uom: String,
    /// Customer taxes in effect (own taxes, or the category's when inherited).
    pub customer_taxes_used: Vec<TaxId>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            code: None,
            name: name.into(),
            salable: true,
            sale_uom: "unit".to_string(),
            customer_taxes_used: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_customer_taxes(mut self, taxes: Vec<TaxId>) -> Self {
        self.customer_taxes_used = taxes;
        self
    }

    pub fn not_salable(mut self) -> Self {
        self.salable = false;
        self
    }
}

impl Entity for Product {
    type Id = ProductId;

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

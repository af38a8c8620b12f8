//! Session context and the company/shop/user records it points at.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use salecart_core::{CompanyId, CurrencyId, Entity, PriceListId, ShopId, UserId};

/// Who is acting, in which shop and company, and on which day.
///
/// Immutable for the duration of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    user: UserId,
    shop: Option<ShopId>,
    company: Option<CompanyId>,
    today: NaiveDate,
}

impl SessionContext {
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            shop: None,
            company: None,
            today: Utc::now().date_naive(),
        }
    }

    pub fn with_shop(mut self, shop: ShopId) -> Self {
        self.shop = Some(shop);
        self
    }

    pub fn with_company(mut self, company: CompanyId) -> Self {
        self.company = Some(company);
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn shop(&self) -> Option<ShopId> {
        self.shop
    }

    pub fn company(&self) -> Option<CompanyId> {
        self.company
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }
}

/// Sales channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub price_list: Option<PriceListId>,
    /// Currency used by the shop's web channel, when it differs from the company's.
    pub esale_currency: Option<CurrencyId>,
}

impl Entity for Shop {
    type Id = ShopId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn rec_name(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub currency: CurrencyId,
}

impl Entity for Company {
    type Id = CompanyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn rec_name(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login: String,
    /// Shop the user sells from by default.
    pub shop: Option<ShopId>,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn rec_name(&self) -> String {
        self.login.clone()
    }
}

//! Fakes for the ERP services, shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use salecart_core::{
    CompanyId, Currency, CurrencyId, DomainError, DomainResult, PartyId, PriceListId, ProductId,
    SaleId, ShopId, TaxId, TaxRuleId, UserId,
};
use salecart_parties::Party;
use salecart_products::Product;
use salecart_sales::{PersistenceError, Sale, SaleLine, SaleOrderService};

use crate::config::CartConfig;
use crate::context::{Company, SessionContext, Shop, User};
use crate::converter::CartToSale;
use crate::manager::CartManager;
use crate::services::{Directory, PriceContext, PricingService, TaxLine, TaxRulePattern, TaxService};
use crate::store::InMemoryCartStore;

#[derive(Debug, Default)]
pub struct FakeDirectory {
    pub parties: HashMap<PartyId, Party>,
    pub products: HashMap<ProductId, Product>,
    pub currencies: HashMap<CurrencyId, Currency>,
    pub shops: HashMap<ShopId, Shop>,
    pub companies: HashMap<CompanyId, Company>,
    pub users: HashMap<UserId, User>,
}

fn lookup<K, V>(map: &HashMap<K, V>, id: K, what: &str) -> DomainResult<V>
where
    K: core::hash::Hash + Eq + core::fmt::Display,
    V: Clone,
{
    map.get(&id)
        .cloned()
        .ok_or_else(|| DomainError::not_found(format!("{what} {id}")))
}

impl Directory for FakeDirectory {
    fn party(&self, id: PartyId) -> DomainResult<Party> {
        lookup(&self.parties, id, "party")
    }

    fn product(&self, id: ProductId) -> DomainResult<Product> {
        lookup(&self.products, id, "product")
    }

    fn currency(&self, id: CurrencyId) -> DomainResult<Currency> {
        lookup(&self.currencies, id, "currency")
    }

    fn shop(&self, id: ShopId) -> DomainResult<Shop> {
        lookup(&self.shops, id, "shop")
    }

    fn company(&self, id: CompanyId) -> DomainResult<Company> {
        lookup(&self.companies, id, "company")
    }

    fn user(&self, id: UserId) -> DomainResult<User> {
        lookup(&self.users, id, "user")
    }
}

/// List prices per product, optionally overridden per price list.
#[derive(Debug, Default)]
pub struct FakePricing {
    pub list_prices: HashMap<ProductId, Decimal>,
    pub price_list_prices: HashMap<(PriceListId, ProductId), Decimal>,
    pub calls: Mutex<Vec<(Decimal, PriceContext)>>,
}

impl PricingService for FakePricing {
    fn sale_prices(
        &self,
        products: &[ProductId],
        quantity: Decimal,
        context: &PriceContext,
    ) -> DomainResult<HashMap<ProductId, Decimal>> {
        self.calls.lock().unwrap().push((quantity, context.clone()));
        products
            .iter()
            .map(|product| {
                let listed = context
                    .price_list
                    .and_then(|list| self.price_list_prices.get(&(list, *product)));
                listed
                    .or_else(|| self.list_prices.get(product))
                    .map(|price| (*product, *price))
                    .ok_or_else(|| DomainError::not_found(format!("price for {product}")))
            })
            .collect()
    }
}

/// Percentage taxes (`rate` as a fraction) and customer rule rewrites.
#[derive(Debug, Default)]
pub struct FakeTaxes {
    pub rates: HashMap<TaxId, Decimal>,
    pub rules: HashMap<(TaxRuleId, TaxId), Vec<TaxId>>,
    pub computed: Mutex<Vec<Vec<TaxId>>>,
}

impl TaxService for FakeTaxes {
    fn compute(
        &self,
        taxes: &[TaxId],
        unit_price: Decimal,
        quantity: Decimal,
    ) -> DomainResult<Vec<TaxLine>> {
        self.computed.lock().unwrap().push(taxes.to_vec());
        let base = unit_price * quantity;
        taxes
            .iter()
            .map(|tax| -> DomainResult<TaxLine> {
                let rate = self
                    .rates
                    .get(tax)
                    .ok_or_else(|| DomainError::not_found(format!("tax {tax}")))?;
                Ok(TaxLine {
                    tax: *tax,
                    base,
                    amount: base * rate,
                })
            })
            .collect()
    }

    fn apply_customer_tax_rule(
        &self,
        rule: TaxRuleId,
        tax: TaxId,
        pattern: &TaxRulePattern,
    ) -> DomainResult<Vec<TaxId>> {
        assert!(pattern.is_empty());
        Ok(self.rules.get(&(rule, tax)).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct FakeSales {
    pub fail_save: AtomicBool,
    pub saved: Mutex<Vec<Sale>>,
}

impl FakeSales {
    pub fn failing() -> Self {
        Self {
            fail_save: AtomicBool::new(true),
            ..Self::default()
        }
    }
}

impl SaleOrderService for FakeSales {
    fn new_sale_skeleton(&self, party: PartyId) -> DomainResult<Sale> {
        let mut sale = Sale::for_party(party);
        sale.description = Some("web order".to_string());
        Ok(sale)
    }

    fn new_sale_line_from_cart(
        &self,
        _sale: &Sale,
        product: ProductId,
        quantity: Decimal,
    ) -> DomainResult<SaleLine> {
        Ok(SaleLine {
            product,
            quantity,
            unit: "unit".to_string(),
            unit_price: None,
            description: None,
        })
    }

    fn save(&self, sales: &mut [Sale]) -> Result<(), PersistenceError> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(PersistenceError::new("sale_party_required constraint violated"));
        }
        let mut saved = self.saved.lock().unwrap();
        for sale in sales.iter_mut() {
            sale.id = Some(SaleId::new());
            saved.push(sale.clone());
        }
        Ok(())
    }
}

pub fn dec(units: i64, scale: u32) -> Decimal {
    Decimal::new(units, scale)
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

/// A company with one EUR shop, one user selling from it, and a product
/// listed at 10.00 with a 10% customer tax.
pub struct Fixture {
    pub eur: Currency,
    pub company: Company,
    pub shop: Shop,
    pub user: User,
    pub product: Product,
    pub vat: TaxId,
    pub directory: FakeDirectory,
    pub pricing: FakePricing,
    pub taxes: FakeTaxes,
    pub sales: FakeSales,
    pub config: CartConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let eur = Currency::with_digits(CurrencyId::new(), "EUR", 2);
        let company = Company {
            id: CompanyId::new(),
            name: "Dunder".to_string(),
            currency: eur.id,
        };
        let shop = Shop {
            id: ShopId::new(),
            name: "Web".to_string(),
            price_list: Some(PriceListId::new()),
            esale_currency: None,
        };
        let user = User {
            id: UserId::new(),
            login: "clerk".to_string(),
            shop: Some(shop.id),
        };
        let vat = TaxId::new();
        let product = Product::new(ProductId::new(), "Paper")
            .with_code("PAP")
            .with_customer_taxes(vec![vat]);

        let mut fixture = Self {
            eur: eur.clone(),
            company: company.clone(),
            shop: shop.clone(),
            user: user.clone(),
            product: product.clone(),
            vat,
            directory: FakeDirectory::default(),
            pricing: FakePricing::default(),
            taxes: FakeTaxes::default(),
            sales: FakeSales::default(),
            config: CartConfig::default(),
        };
        fixture.directory.currencies.insert(eur.id, eur);
        fixture.directory.companies.insert(company.id, company);
        fixture.directory.shops.insert(shop.id, shop);
        fixture.directory.users.insert(user.id, user);
        fixture.directory.products.insert(product.id, product.clone());
        fixture.pricing.list_prices.insert(product.id, dec(1000, 2));
        fixture.taxes.rates.insert(vat, dec(10, 2));
        fixture
    }

    pub fn add_party(&mut self, name: &str) -> Party {
        self.insert_party(Party::new(PartyId::new(), name))
    }

    pub fn insert_party(&mut self, party: Party) -> Party {
        self.directory.parties.insert(party.id, party.clone());
        party
    }

    pub fn session(&self) -> SessionContext {
        SessionContext::new(self.user.id)
            .with_shop(self.shop.id)
            .with_company(self.company.id)
            .with_today(today())
    }

    pub fn build(self) -> Harness {
        let session = self.session();
        let store = Arc::new(InMemoryCartStore::new());
        let pricing = Arc::new(self.pricing);
        let taxes = Arc::new(self.taxes);
        let sales = Arc::new(self.sales);
        let manager = Arc::new(CartManager::new(
            self.config,
            store.clone(),
            Arc::new(self.directory),
            pricing.clone(),
            taxes.clone(),
        ));
        let converter = Arc::new(CartToSale::new(manager.clone(), sales.clone()));
        Harness {
            session,
            eur: self.eur,
            product: self.product,
            store,
            pricing,
            taxes,
            sales,
            manager,
            converter,
        }
    }
}

pub struct Harness {
    pub session: SessionContext,
    pub eur: Currency,
    pub product: Product,
    pub store: Arc<InMemoryCartStore>,
    pub pricing: Arc<FakePricing>,
    pub taxes: Arc<FakeTaxes>,
    pub sales: Arc<FakeSales>,
    pub manager: Arc<CartManager>,
    pub converter: Arc<CartToSale>,
}

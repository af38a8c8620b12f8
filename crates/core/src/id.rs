//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered), so later records sort after earlier
            /// ones. Prefer passing IDs explicitly in tests for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

uuid_newtype!(
    /// Identifier of a cart line.
    CartLineId,
    "CartLineId"
);
uuid_newtype!(
    /// Identifier of a customer/counterparty.
    PartyId,
    "PartyId"
);
uuid_newtype!(
    /// Identifier of a product variant.
    ProductId,
    "ProductId"
);
uuid_newtype!(
    /// Identifier of a sales channel (shop).
    ShopId,
    "ShopId"
);
uuid_newtype!(CompanyId, "CompanyId");
uuid_newtype!(CurrencyId, "CurrencyId");
uuid_newtype!(PriceListId, "PriceListId");
uuid_newtype!(TaxId, "TaxId");
uuid_newtype!(TaxRuleId, "TaxRuleId");
uuid_newtype!(
    /// Identifier of a sale order, assigned by the sale-order service.
    SaleId,
    "SaleId"
);
uuid_newtype!(
    /// Identifier of a user (actor identity).
    UserId,
    "UserId"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_through_display() {
        let id = CartLineId::new();
        let parsed: CartLineId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_error_names_the_id_type() {
        let err = "not-a-uuid".parse::<PartyId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.starts_with("PartyId")),
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }
}

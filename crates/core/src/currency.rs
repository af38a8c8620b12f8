//! Currency record and its rounding rule.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::CurrencyId;

/// Display precision used when a record has no currency.
pub const DEFAULT_DIGITS: u32 = 2;

/// Round half to even at `digits` decimal places.
pub fn round_to_digits(amount: Decimal, digits: u32) -> Decimal {
    amount.round_dp_with_strategy(digits, RoundingStrategy::MidpointNearestEven)
}

/// A currency as exposed by the record store.
///
/// `rounding` is the smallest representable step (e.g. `0.01`, `0.05`);
/// `digits` is the number of decimal places shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    pub code: String,
    pub digits: u32,
    pub rounding: Decimal,
}

impl Currency {
    /// Currency whose rounding step matches its digits (`0.01` for 2 digits).
    pub fn with_digits(id: CurrencyId, code: impl Into<String>, digits: u32) -> Self {
        Self {
            id,
            code: code.into(),
            digits,
            rounding: Decimal::new(1, digits),
        }
    }

    /// Round `amount` to a multiple of the rounding step, half to even.
    pub fn round(&self, amount: Decimal) -> Decimal {
        let stepped = if self.rounding.is_zero() {
            amount
        } else {
            amount
                .checked_div(self.rounding)
                .map(|steps| {
                    steps.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
                        * self.rounding
                })
                .unwrap_or(amount)
        };
        round_to_digits(stepped, self.digits)
    }
}

impl Entity for Currency {
    type Id = CurrencyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn rec_name(&self) -> String {
        self.code.clone()
    }
}

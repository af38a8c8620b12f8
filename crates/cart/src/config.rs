//! Cart settings, read from the environment.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decimal places kept on unit prices unless configured otherwise.
pub const DEFAULT_PRICE_DIGITS: u32 = 4;

/// Environment variable overriding [`CartConfig::price_digits`].
pub const PRICE_DIGITS_ENV: &str = "SALECART_PRICE_DECIMAL";

/// Environment variable overriding [`CartConfig::save_failure_policy`].
pub const SAVE_FAILURE_POLICY_ENV: &str = "SALECART_SAVE_FAILURE_POLICY";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// What happens to cart lines when saving the converted sales fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveFailurePolicy {
    /// Lines are marked done anyway and the unsaved sales are dropped,
    /// leaving done lines without a sale order.
    #[default]
    MarkDone,
    /// Lines keep their state so the conversion can be retried.
    KeepState,
}

impl FromStr for SaveFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mark_done" => Ok(Self::MarkDone),
            "keep_state" => Ok(Self::KeepState),
            _ => Err(ConfigError::Invalid {
                var: SAVE_FAILURE_POLICY_ENV,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Decimal places of unit prices.
    pub price_digits: u32,
    pub save_failure_policy: SaveFailurePolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            price_digits: DEFAULT_PRICE_DIGITS,
            save_failure_policy: SaveFailurePolicy::default(),
        }
    }
}

impl CartConfig {
    /// Defaults overridden by `SALECART_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(PRICE_DIGITS_ENV) {
            let digits = value.trim().parse::<u32>().ok().filter(|digits| *digits <= 12);
            config.price_digits = digits.ok_or(ConfigError::Invalid {
                var: PRICE_DIGITS_ENV,
                value,
            })?;
        }

        if let Some(value) = lookup(SAVE_FAILURE_POLICY_ENV) {
            config.save_failure_policy = value.parse()?;
        }

        Ok(config)
    }
}

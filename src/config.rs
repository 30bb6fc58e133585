// 7.0 config.rs: market and quote settings. fixed at creation, never mutated after.
// 7.1 MarketConfig carries the fee split and invariant tolerances. QuoteConfig the solver knobs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// Complete configuration for one market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    // Human readable market name, used in log fields
    pub name: String,
    // Fraction of every buy taken as fee, in [0, 1)
    pub fee_fraction: Decimal,
    // Fraction of each fee immediately added back as liquidity, in [0, 1]
    pub fee_to_liquidity_fraction: Decimal,
    // Max drift of lp_yes / lp_no across a liquidity add
    pub ratio_tolerance: Decimal,
    // Constant product tolerance is min(lp_yes, lp_no) / this
    pub product_tolerance_divisor: Decimal,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            name: "YES/NO".to_string(),
            fee_fraction: Decimal::ZERO,
            fee_to_liquidity_fraction: Decimal::ZERO,
            ratio_tolerance: dec!(0.000001),
            product_tolerance_divisor: dec!(100_000_000),
        }
    }
}

impl MarketConfig {
    pub fn no_fee() -> Self {
        Self::default()
    }

    // all fees stay in the fee pool
    pub fn with_fee(fee_fraction: Decimal) -> Self {
        Self {
            fee_fraction,
            ..Self::default()
        }
    }

    // part of every fee deepens the pool before the trade executes
    pub fn reinvesting(fee_fraction: Decimal, fee_to_liquidity_fraction: Decimal) -> Self {
        Self {
            fee_fraction,
            fee_to_liquidity_fraction,
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_fraction < Decimal::ZERO || self.fee_fraction >= Decimal::ONE {
            return Err(ConfigError::InvalidFee {
                reason: format!("fee fraction {} must be in [0, 1)", self.fee_fraction),
            });
        }

        if self.fee_to_liquidity_fraction < Decimal::ZERO || self.fee_to_liquidity_fraction > Decimal::ONE {
            return Err(ConfigError::InvalidFee {
                reason: format!(
                    "fee to liquidity fraction {} must be in [0, 1]",
                    self.fee_to_liquidity_fraction
                ),
            });
        }

        if self.ratio_tolerance <= Decimal::ZERO || self.product_tolerance_divisor <= Decimal::ZERO {
            return Err(ConfigError::InvalidTolerance {
                reason: "tolerances must be positive".to_string(),
            });
        }

        Ok(())
    }
}

/** 7.2: bisection solver settings */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteConfig {
    // Step for the one-sided derivative that estimates the marginal rate
    pub derivative_step: Decimal,
    // Extra iterations on top of log2(hi / approx_eps)
    pub iteration_margin: u32,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            derivative_step: dec!(0.001),
            iteration_margin: 32,
        }
    }
}

impl QuoteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.derivative_step <= Decimal::ZERO {
            return Err(ConfigError::InvalidQuote {
                reason: "derivative step must be positive".to_string(),
            });
        }
        Ok(())
    }
}

// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid fee config: {reason}")]
    InvalidFee { reason: String },

    #[error("Invalid tolerance config: {reason}")]
    InvalidTolerance { reason: String },

    #[error("Invalid quote config: {reason}")]
    InvalidQuote { reason: String },
}

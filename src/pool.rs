// 2.0: pool ledger. reserves, liquidity, fees for one market.
// 2.1: ratio preserving add. the only primitive that mints outcome tokens into the pool.
//
// every unit of collateral that enters mints one YES and one NO. whatever the pool
// doesn't keep on the minority side is owed to LPs as outstanding tokens.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MarketConfig;
use crate::engine::MarketError;
use crate::types::Outcome;

// rust_decimal operators panic on overflow. pool math goes through here instead
pub(crate) fn checked(value: Option<Decimal>, operation: &'static str) -> Result<Decimal, MarketError> {
    value.ok_or(MarketError::Overflow(operation))
}

/** 2.0: all pool state lives here. configuration constants are copied in at creation */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolState {
    // collateral deposited by LPs, never decreases
    pub liquidity: Decimal,
    // collateral accounted through every operation (deposits + net trade collateral)
    pub lp_token: Decimal,
    pub lp_yes: Decimal,
    pub lp_no: Decimal,
    // surplus minted during ratio preserving adds, owed to LPs
    pub outstanding_yes: Decimal,
    pub outstanding_no: Decimal,
    // fees collected, never decreases
    pub fee_pool: Decimal,
    pub initial_liquidity: Decimal,
    pub fee_fraction: Decimal,
    pub fee_to_liquidity_fraction: Decimal,
    pub(crate) product_tolerance_divisor: Decimal,
}

impl PoolState {
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            liquidity: Decimal::ZERO,
            lp_token: Decimal::ZERO,
            lp_yes: Decimal::ZERO,
            lp_no: Decimal::ZERO,
            outstanding_yes: Decimal::ZERO,
            outstanding_no: Decimal::ZERO,
            fee_pool: Decimal::ZERO,
            initial_liquidity: Decimal::ZERO,
            fee_fraction: config.fee_fraction,
            fee_to_liquidity_fraction: config.fee_to_liquidity_fraction,
            product_tolerance_divisor: config.product_tolerance_divisor,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.lp_token > Decimal::ZERO
    }

    // owned copy for read-only analytics while the owner keeps trading
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn reserve(&self, side: Outcome) -> Decimal {
        match side {
            Outcome::Yes => self.lp_yes,
            Outcome::No => self.lp_no,
        }
    }

    pub fn outstanding(&self, side: Outcome) -> Decimal {
        match side {
            Outcome::Yes => self.outstanding_yes,
            Outcome::No => self.outstanding_no,
        }
    }

    pub(crate) fn reserve_mut(&mut self, side: Outcome) -> &mut Decimal {
        match side {
            Outcome::Yes => &mut self.lp_yes,
            Outcome::No => &mut self.lp_no,
        }
    }

    // lp_yes / lp_no. zero on an empty pool
    pub fn yes_to_no_ratio(&self) -> Decimal {
        if self.lp_no.is_zero() {
            return Decimal::ZERO;
        }
        self.lp_yes / self.lp_no
    }

    // committed pools always have a representable product, see add_at_ratio
    pub fn product(&self) -> Decimal {
        self.lp_yes * self.lp_no
    }

    pub fn checked_product(&self) -> Result<Decimal, MarketError> {
        checked(self.lp_yes.checked_mul(self.lp_no), "product")
    }

    pub(crate) fn checked_yes_to_no_ratio(&self) -> Result<Decimal, MarketError> {
        if self.lp_no.is_zero() {
            return Ok(Decimal::ZERO);
        }
        checked(self.lp_yes.checked_div(self.lp_no), "yes to no ratio")
    }

    // scales with pool size so small and large markets get the same relative slack
    pub fn product_tolerance(&self) -> Decimal {
        self.lp_yes.min(self.lp_no) / self.product_tolerance_divisor
    }

    /// Ratio preserving add. `ratio` is the target lp_yes / lp_no. The dominant side
    /// takes the full `amount`, the other side is resized to keep the ratio and the
    /// rest of its minted tokens go to outstanding. Returns the credited side and surplus.
    /// Fails with `Overflow` if the grown pool no longer fits a Decimal, leaving the
    /// pool partly written, so callers run it on a staged copy.
    pub(crate) fn add_at_ratio(&mut self, amount: Decimal, ratio: Decimal) -> Result<(Outcome, Decimal), MarketError> {
        let (surplus_side, surplus) = if ratio >= Decimal::ONE {
            let grown = checked(amount.checked_add(self.lp_yes), "add liquidity")?;
            let new_no = checked(grown.checked_div(ratio), "add liquidity")?;
            let minted = checked(self.lp_no.checked_add(amount), "add liquidity")?;
            let surplus = minted - new_no;
            self.lp_no = new_no;
            self.lp_yes = grown;
            self.outstanding_no = checked(self.outstanding_no.checked_add(surplus), "add liquidity")?;
            (Outcome::No, surplus)
        } else {
            let grown = checked(amount.checked_add(self.lp_no), "add liquidity")?;
            let new_yes = checked(grown.checked_mul(ratio), "add liquidity")?;
            let minted = checked(self.lp_yes.checked_add(amount), "add liquidity")?;
            let surplus = minted - new_yes;
            self.lp_yes = new_yes;
            self.lp_no = grown;
            self.outstanding_yes = checked(self.outstanding_yes.checked_add(surplus), "add liquidity")?;
            (Outcome::Yes, surplus)
        };

        self.liquidity = checked(self.liquidity.checked_add(amount), "add liquidity")?;
        self.lp_token = checked(self.lp_token.checked_add(amount), "add liquidity")?;
        self.checked_product()?;

        Ok((surplus_side, surplus))
    }
}

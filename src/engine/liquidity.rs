//! Liquidity operations: market creation and ratio preserving adds.

use super::core::{check_invariant, Fill, Market, Staged};
use super::results::{InvariantKind, LiquidityResult, MarketError};
use crate::types::{Activity, EntrySide};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

impl Market {
    /// Seed the pool with `initial_liquidity` collateral at the requested YES:NO ratio.
    /// Returns the side credited with outstanding tokens and the surplus.
    pub fn create_event(
        &mut self,
        initial_liquidity: Decimal,
        initial_yes_to_no_ratio: Decimal,
    ) -> Result<LiquidityResult, MarketError> {
        if initial_yes_to_no_ratio <= Decimal::ZERO {
            return Err(MarketError::InvalidRatio(initial_yes_to_no_ratio));
        }
        if initial_liquidity <= Decimal::ZERO {
            return Err(MarketError::InvalidAmount(initial_liquidity));
        }
        if self.pool.is_initialized() {
            return Err(MarketError::AlreadyInitialized);
        }

        let mut staged = self.stage();
        staged.pool.initial_liquidity = initial_liquidity;
        let result = staged
            .add_at_ratio(initial_liquidity, initial_yes_to_no_ratio)
            .inspect_err(|e| warn!(market = %self.config.name, error = %e, "create_event rejected"))?;
        self.commit(staged);

        info!(
            market = %self.config.name,
            liquidity = %initial_liquidity,
            ratio = %initial_yes_to_no_ratio,
            lp_yes = %self.pool.lp_yes,
            lp_no = %self.pool.lp_no,
            "event created"
        );
        Ok(result)
    }

    // 50:50 market
    pub fn create_even_event(&mut self, initial_liquidity: Decimal) -> Result<LiquidityResult, MarketError> {
        self.create_event(initial_liquidity, Decimal::ONE)
    }

    /// Deepen the pool at its current YES:NO ratio.
    pub fn add_liquidity(&mut self, amount: Decimal) -> Result<LiquidityResult, MarketError> {
        if amount <= Decimal::ZERO {
            return Err(MarketError::InvalidAmount(amount));
        }

        let mut staged = self.stage();
        let result = staged
            .add_liquidity(amount)
            .inspect_err(|e| warn!(market = %self.config.name, error = %e, "add_liquidity rejected"))?;
        self.commit(staged);

        debug!(
            market = %self.config.name,
            amount = %amount,
            surplus_side = %result.side,
            surplus = %result.tokens_returned,
            "liquidity added"
        );
        Ok(result)
    }
}

impl Staged {
    // also the fee reinvestment path of a trade
    pub(super) fn add_liquidity(&mut self, amount: Decimal) -> Result<LiquidityResult, MarketError> {
        if !self.pool.is_initialized() {
            return Err(MarketError::UninitializedPool);
        }
        let ratio = self.pool.checked_yes_to_no_ratio()?;
        self.add_at_ratio(amount, ratio)
    }

    pub(super) fn add_at_ratio(&mut self, amount: Decimal, ratio: Decimal) -> Result<LiquidityResult, MarketError> {
        let (side, surplus) = self.pool.add_at_ratio(amount, ratio)?;

        let new_ratio = self.pool.checked_yes_to_no_ratio()?;
        check_invariant(InvariantKind::Ratio, ratio, new_ratio, self.ratio_tolerance)?;

        let fill = Fill {
            amount,
            fee: Decimal::ZERO,
            price: ratio,
            slippage: Decimal::ZERO,
            tokens_returned: surplus,
        };
        self.record(Activity::Add, EntrySide::Liquidity, fill)?;

        Ok(LiquidityResult {
            side,
            tokens_returned: surplus,
        })
    }
}

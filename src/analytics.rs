// 3.0: read-only analytics over a pool. nothing in here mutates state.
// 3.1 pricing (calc_buy / calc_sell), 3.2 price and slippage, 3.3 LP accounting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::MarketError;
use crate::pool::{checked, PoolState};
use crate::types::Outcome;

// Result of pricing a buy without executing it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyCalc {
    // outcome tokens handed to the buyer
    pub tokens_returned: Decimal,
    // change of the purchased side reserve, negative for a buy
    pub reserve_delta: Decimal,
}

// Surplus on the side LPs hold more of than they could redeem as complete sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingToken {
    pub side: Outcome,
    pub amount: Decimal,
}

impl PoolState {
    /// 3.1: constant product pricing for `amount` of net collateral on `side`.
    /// A negative amount prices the reverse flow, which is how sells are modelled.
    pub fn calc_buy(&self, side: Outcome, amount: Decimal) -> Result<BuyCalc, MarketError> {
        if !self.is_initialized() {
            return Err(MarketError::UninitializedPool);
        }

        let own = self.reserve(side);
        let opposite = checked(self.reserve(side.opposite()).checked_add(amount), "buy pricing")?;
        if opposite <= Decimal::ZERO {
            return Err(MarketError::InsufficientDepth { side, amount });
        }

        let new_own = checked(self.checked_product()?.checked_div(opposite), "buy pricing")?;
        let reserve_delta = checked(new_own.checked_sub(own), "buy pricing")?;
        Ok(BuyCalc {
            tokens_returned: checked(amount.checked_sub(reserve_delta), "buy pricing")?,
            reserve_delta,
        })
    }

    // outcome tokens needed to take `amount` of collateral out of the pool
    pub fn calc_sell(&self, side: Outcome, amount: Decimal) -> Result<Decimal, MarketError> {
        Ok(-self.calc_buy(side, -amount)?.tokens_returned)
    }

    /// 3.2: zero size price of `side`, read as the opposite reserve's share of the pool.
    /// With lp_yes = 900, lp_no = 1100 YES quotes 0.55.
    pub fn calc_marginal_price(&self, side: Outcome) -> Decimal {
        let total = self.lp_yes + self.lp_no;
        if total.is_zero() {
            return Decimal::ZERO;
        }
        self.reserve(side.opposite()) / total
    }

    // collateral paid per outcome token for a hypothetical buy
    pub fn calc_realized_price(&self, side: Outcome, amount: Decimal) -> Result<Decimal, MarketError> {
        if amount.is_zero() {
            return Err(MarketError::InvalidAmount(amount));
        }
        let buy = self.calc_buy(side, amount)?;
        checked(amount.checked_div(buy.tokens_returned), "realized price")
    }

    pub fn calc_slippage(&self, side: Outcome, amount: Decimal) -> Result<Decimal, MarketError> {
        let realized = self.calc_realized_price(side, amount)?;
        Ok(slippage(realized, self.calc_marginal_price(side)))
    }

    // 3.3: collateral LPs could redeem right now as complete YES+NO sets
    pub fn calc_withdrawable_liquidity(&self) -> Decimal {
        (self.lp_yes + self.outstanding_yes).min(self.lp_no + self.outstanding_no)
    }

    pub fn calc_payout(&self) -> Decimal {
        self.lp_token - self.calc_withdrawable_liquidity()
    }

    pub fn calc_outstanding_token(&self) -> OutstandingToken {
        let yes_total = self.lp_yes + self.outstanding_yes;
        let no_total = self.lp_no + self.outstanding_no;
        let withdrawable = yes_total.min(no_total);

        if yes_total >= no_total {
            OutstandingToken { side: Outcome::Yes, amount: yes_total - withdrawable }
        } else {
            OutstandingToken { side: Outcome::No, amount: no_total - withdrawable }
        }
    }

    /// Deposited liquidity minus what is withdrawable. Rounding noise below zero within
    /// the product tolerance reads as zero, anything lower is an accounting error.
    pub fn calc_impermanent_loss(&self) -> Result<Decimal, MarketError> {
        let loss = self.liquidity - self.calc_withdrawable_liquidity();
        if loss < -self.product_tolerance() {
            return Err(MarketError::NegativeImpermanentLoss(loss));
        }
        Ok(loss.max(Decimal::ZERO))
    }
}

// fractional odds of a trade. negative when the pool pays less than even money
pub fn calc_british_odds(tokens_returned: Decimal, amount: Decimal) -> Option<Decimal> {
    if amount.is_zero() {
        return None;
    }
    Some((tokens_returned - amount) / amount)
}

pub(crate) fn slippage(realized_price: Decimal, marginal_price: Decimal) -> Decimal {
    (realized_price - marginal_price) / realized_price
}

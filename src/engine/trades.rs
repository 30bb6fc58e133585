//! Token purchase under the constant product invariant.

use super::core::{check_invariant, Fill, Market, Staged};
use super::results::{InvariantKind, MarketError, TradeResult};
use crate::analytics::slippage;
use crate::pool::checked;
use crate::types::{Activity, Outcome};
use rust_decimal::Decimal;
use tracing::{debug, warn};

impl Market {
    /// Buy `side` with `original_amount` collateral. The fee comes off the top and its
    /// reinvested share deepens the pool before the trade is priced.
    pub fn buy_token(&mut self, side: Outcome, original_amount: Decimal) -> Result<TradeResult, MarketError> {
        if original_amount <= Decimal::ZERO {
            return Err(MarketError::InvalidAmount(original_amount));
        }
        if !self.pool.is_initialized() {
            return Err(MarketError::UninitializedPool);
        }

        let mut staged = self.stage();
        let result = staged.buy(side, original_amount).inspect_err(|e| {
            warn!(market = %self.config.name, %side, amount = %original_amount, error = %e, "buy rejected")
        })?;
        self.commit(staged);

        debug!(
            market = %self.config.name,
            %side,
            amount = %original_amount,
            tokens = %result.tokens_returned,
            price = %result.realized_price,
            slippage = %result.slippage,
            "token bought"
        );
        Ok(result)
    }
}

impl Staged {
    fn buy(&mut self, side: Outcome, original_amount: Decimal) -> Result<TradeResult, MarketError> {
        let fee = checked(original_amount.checked_mul(self.pool.fee_fraction), "fee")?;
        let net_amount = original_amount - fee;
        self.pool.fee_pool = checked(self.pool.fee_pool.checked_add(fee), "fee")?;

        let reinvested = checked(fee.checked_mul(self.pool.fee_to_liquidity_fraction), "fee")?;
        if reinvested > Decimal::ZERO {
            self.add_liquidity(reinvested)?;
        }

        let k = self.pool.checked_product()?;
        let buy = self.pool.calc_buy(side, net_amount)?;
        self.pool.lp_token = checked(self.pool.lp_token.checked_add(net_amount), "buy")?;

        // priced against pre-trade reserves
        let realized_price = checked(net_amount.checked_div(buy.tokens_returned), "buy")?;
        let marginal_price = self.pool.calc_marginal_price(side);
        let slippage = slippage(realized_price, marginal_price);
        if slippage <= Decimal::ZERO {
            return Err(MarketError::NonPositiveSlippage {
                side,
                amount: original_amount,
                slippage,
            });
        }

        let own = self.pool.reserve_mut(side);
        *own = checked(own.checked_add(buy.reserve_delta), "buy")?;
        let opposite = self.pool.reserve_mut(side.opposite());
        *opposite = checked(opposite.checked_add(net_amount), "buy")?;

        let product = self.pool.checked_product()?;
        check_invariant(InvariantKind::ConstantProduct, k, product, self.pool.product_tolerance())?;

        let fill = Fill {
            amount: original_amount,
            fee,
            price: realized_price,
            slippage,
            tokens_returned: buy.tokens_returned,
        };
        self.record(Activity::Buy, side.into(), fill)?;

        Ok(TradeResult {
            side,
            tokens_returned: buy.tokens_returned,
            fee,
            realized_price,
            slippage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;
    use crate::types::EntrySide;
    use rust_decimal_macros::dec;

    fn close(a: Decimal, b: Decimal, tol: Decimal) -> bool {
        (a - b).abs() <= tol
    }

    fn even_market(config: MarketConfig) -> Market {
        let mut market = Market::new(config).unwrap();
        market.create_even_event(dec!(1000)).unwrap();
        market
    }

    #[test]
    fn buy_yes_no_fee() {
        let mut market = even_market(MarketConfig::no_fee());
        let result = market.buy_token(Outcome::Yes, dec!(100)).unwrap();

        assert_eq!(result.side, Outcome::Yes);
        assert_eq!(result.fee, Decimal::ZERO);
        assert!(close(result.tokens_returned, dec!(190.909090909), dec!(0.000001)));
        assert!(close(result.realized_price, dec!(0.5238095), dec!(0.000001)));

        let pool = market.pool();
        assert!(close(pool.lp_yes, dec!(909.090909091), dec!(0.000001)));
        assert_eq!(pool.lp_no, dec!(1100));
        assert_eq!(pool.lp_token, dec!(1100));
        assert!(close(pool.product(), dec!(1_000_000), dec!(0.00001)));
    }

    #[test]
    fn buy_records_history() {
        let mut market = even_market(MarketConfig::no_fee());
        market.buy_token(Outcome::No, dec!(50)).unwrap();

        let entry = market.history().last().unwrap();
        assert_eq!(entry.sequence, 1);
        assert_eq!(entry.activity, Activity::Buy);
        assert_eq!(entry.side, EntrySide::No);
        assert_eq!(entry.amount, dec!(50));
        assert!(entry.slippage > Decimal::ZERO);
        assert!(entry.impermanent_loss > Decimal::ZERO);
        assert_eq!(entry.outstanding_side, Outcome::Yes);
        assert_eq!(entry.lp_yes, dec!(1050));
    }

    #[test]
    fn fee_goes_to_fee_pool() {
        let mut market = even_market(MarketConfig::with_fee(dec!(0.03)));
        let result = market.buy_token(Outcome::Yes, dec!(100)).unwrap();

        assert_eq!(result.fee, dec!(3));
        assert_eq!(market.pool().fee_pool, dec!(3));
        assert_eq!(market.pool().lp_no, dec!(1097));
        assert_eq!(market.pool().lp_token, dec!(1097));
        assert_eq!(market.pool().liquidity, dec!(1000));
    }

    #[test]
    fn fee_reinvested_before_trade() {
        let mut market = even_market(MarketConfig::reinvesting(dec!(0.1), dec!(0.5)));
        market.buy_token(Outcome::Yes, dec!(100)).unwrap();

        // create, reinvest add, buy
        let entries = market.history().entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].activity, Activity::Add);
        assert_eq!(entries[1].amount, dec!(5));
        assert_eq!(entries[1].lp_yes, dec!(1005));
        assert_eq!(entries[2].activity, Activity::Buy);

        let pool = market.pool();
        assert_eq!(pool.fee_pool, dec!(10));
        assert_eq!(pool.liquidity, dec!(1005));
        assert_eq!(pool.lp_no, dec!(1095));
        assert!(close(pool.product(), dec!(1005) * dec!(1005), dec!(0.0001)));
    }

    #[test]
    fn buy_rejects_bad_input() {
        let mut market = Market::new(MarketConfig::no_fee()).unwrap();
        assert!(matches!(market.buy_token(Outcome::Yes, dec!(10)), Err(MarketError::UninitializedPool)));

        market.create_even_event(dec!(1000)).unwrap();
        assert!(matches!(market.buy_token(Outcome::Yes, Decimal::ZERO), Err(MarketError::InvalidAmount(_))));
        assert_eq!(market.history().len(), 1);
    }

    #[test]
    fn failed_buy_rolls_back_everything() {
        let mut market = even_market(MarketConfig::reinvesting(dec!(0.1), dec!(0.5)));
        // corrupt the ledger so the post-trade accounting check fails
        market.pool.outstanding_yes = dec!(5000);
        market.pool.outstanding_no = dec!(5000);
        let pool_before = market.pool().clone();

        let result = market.buy_token(Outcome::Yes, dec!(100));

        let err = result.unwrap_err();
        assert!(matches!(err, MarketError::NegativeImpermanentLoss(_)));
        assert!(err.is_fatal());
        // neither the fee, the reinvested add nor the trade survived
        assert_eq!(market.pool(), &pool_before);
        assert_eq!(market.history().len(), 1);
    }

    #[test]
    fn opposite_buys_move_price_back() {
        let mut market = even_market(MarketConfig::no_fee());
        market.buy_token(Outcome::Yes, dec!(100)).unwrap();
        let yes_price = market.pool().calc_marginal_price(Outcome::Yes);
        assert!(yes_price > dec!(0.5));

        market.buy_token(Outcome::No, dec!(100)).unwrap();
        assert!(market.pool().calc_marginal_price(Outcome::Yes) < yes_price);
    }

    #[test]
    fn oversized_buy_breaks_constant_product_and_rolls_back() {
        let mut market = even_market(MarketConfig::no_fee());
        let pool_before = market.pool().clone();

        // the purchased reserve rounds down to dust and k can no longer be held
        let err = market.buy_token(Outcome::Yes, Decimal::MAX / dec!(2)).unwrap_err();

        assert!(matches!(
            err,
            MarketError::InvariantViolation {
                kind: InvariantKind::ConstantProduct,
                ..
            }
        ));
        assert!(err.is_fatal());
        assert_eq!(market.pool(), &pool_before);
        assert_eq!(market.history().len(), 1);
    }

    #[test]
    fn buy_that_overflows_is_an_error() {
        let mut market = even_market(MarketConfig::no_fee());
        let pool_before = market.pool().clone();

        let err = market.buy_token(Outcome::No, Decimal::MAX).unwrap_err();

        assert!(matches!(err, MarketError::Overflow(_)));
        assert!(!err.is_fatal());
        assert_eq!(market.pool(), &pool_before);
        market.buy_token(Outcome::No, dec!(10)).unwrap();
    }

    #[test]
    fn non_positive_slippage_is_rejected() {
        let mut market = even_market(MarketConfig::no_fee());
        // a negative YES reserve makes the buy cheaper than the quoted marginal price
        market.pool.lp_yes = dec!(-500);
        let pool_before = market.pool().clone();

        let err = market.buy_token(Outcome::Yes, dec!(100)).unwrap_err();

        match err {
            MarketError::NonPositiveSlippage { side, amount, slippage } => {
                assert_eq!(side, Outcome::Yes);
                assert_eq!(amount, dec!(100));
                assert!(slippage <= Decimal::ZERO);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(MarketError::NonPositiveSlippage {
            side: Outcome::Yes,
            amount: dec!(100),
            slippage: Decimal::ZERO,
        }
        .is_fatal());
        assert_eq!(market.pool(), &pool_before);
        assert_eq!(market.history().len(), 1);
    }
}

// 5.0: quote solver. inverts sell pricing by bisection over the collateral amount.
// the pricing function is a black box behind SellPricing, it is only ever read.
//
// precision contract: a returned quote moves `tokens` outcome tokens with
// target - approx_eps <= tokens < target. undershoot is fine, overshoot never is.

use rust_decimal::Decimal;

use crate::config::QuoteConfig;
use crate::engine::{MarketError, QuoteResult};
use crate::pool::{checked, PoolState};
use crate::types::Outcome;

// Outcome tokens moved by taking `amount` of collateral out on `side`
pub trait SellPricing {
    fn calc_sell(&self, side: Outcome, amount: Decimal) -> Result<Decimal, MarketError>;
}

impl SellPricing for PoolState {
    fn calc_sell(&self, side: Outcome, amount: Decimal) -> Result<Decimal, MarketError> {
        PoolState::calc_sell(self, side, amount)
    }
}

/// Smallest collateral quote whose sell lands within `approx_eps` below `target`.
pub fn solve_quote<P: SellPricing + ?Sized>(
    pricing: &P,
    side: Outcome,
    target: Decimal,
    approx_eps: Decimal,
    config: &QuoteConfig,
) -> Result<QuoteResult, MarketError> {
    if target <= Decimal::ZERO {
        return Err(MarketError::InvalidAmount(target));
    }
    if approx_eps <= Decimal::ZERO {
        return Err(MarketError::InvalidAmount(approx_eps));
    }
    config.validate()?;

    let not_converged = |iterations| MarketError::QuoteNotConverged {
        target,
        approx_eps,
        iterations,
    };

    // one-sided derivative: tokens per unit of collateral at zero size
    let step = config.derivative_step;
    let marginal_rate = pricing.calc_sell(side, step)? / step;
    if marginal_rate <= Decimal::ZERO {
        return Err(not_converged(0));
    }
    let marginal_price = Decimal::ONE / marginal_rate;

    // slippage only makes tokens dearer, so the zero-slippage cost bounds the answer
    let mut lo = Decimal::ZERO;
    let mut hi = checked(marginal_price.checked_mul(target), "quote bound")?;

    let resolvable = match probe(pricing, side, hi)? {
        Some(tokens) => step < tokens,
        None => true,
    };
    if !resolvable {
        return Err(not_converged(0));
    }

    let max_iterations = halvings(hi, approx_eps) + config.iteration_margin;
    for iteration in 1..=max_iterations {
        let mid = lo + (hi - lo) / Decimal::TWO;
        match probe(pricing, side, mid)? {
            Some(tokens) if tokens < target => {
                if target - tokens <= approx_eps {
                    return Ok(QuoteResult {
                        collateral: mid,
                        tokens,
                        iterations: iteration,
                    });
                }
                lo = mid;
            }
            _ => hi = mid,
        }
    }

    Err(not_converged(max_iterations))
}

// None when the amount would drain the pool, which counts as overshoot
fn probe<P: SellPricing + ?Sized>(pricing: &P, side: Outcome, amount: Decimal) -> Result<Option<Decimal>, MarketError> {
    match pricing.calc_sell(side, amount) {
        Ok(tokens) => Ok(Some(tokens)),
        Err(MarketError::InsufficientDepth { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

// ceil(log2(range / precision)) without leaving Decimal
fn halvings(range: Decimal, precision: Decimal) -> u32 {
    let mut span = range;
    let mut count = 0;
    while span > precision {
        span /= Decimal::TWO;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;
    use rust_decimal_macros::dec;

    fn pool(liquidity: Decimal, ratio: Decimal) -> PoolState {
        let mut pool = PoolState::new(&MarketConfig::default());
        pool.add_at_ratio(liquidity, ratio).unwrap();
        pool
    }

    // linear pricing, 2 tokens per unit of collateral
    struct Flat;

    impl SellPricing for Flat {
        fn calc_sell(&self, _side: Outcome, amount: Decimal) -> Result<Decimal, MarketError> {
            Ok(amount * Decimal::TWO)
        }
    }

    #[test]
    fn quote_within_precision() {
        let pool = pool(dec!(1000), dec!(0.7));
        let eps = dec!(0.001);
        let quote = solve_quote(&pool, Outcome::No, dec!(100), eps, &QuoteConfig::default()).unwrap();

        let delivered = pool.calc_sell(Outcome::No, quote.collateral).unwrap();
        assert_eq!(delivered, quote.tokens);
        assert!(delivered < dec!(100));
        assert!(dec!(100) - delivered <= eps);
        assert!(quote.iterations > 0);
    }

    #[test]
    fn quote_against_black_box() {
        let quote = solve_quote(&Flat, Outcome::Yes, dec!(10), dec!(0.01), &QuoteConfig::default()).unwrap();
        assert!(quote.collateral < dec!(5));
        assert!(quote.collateral >= dec!(4.995));
    }

    #[test]
    fn quote_rejects_bad_input() {
        let pool = pool(dec!(1000), Decimal::ONE);
        let config = QuoteConfig::default();
        assert!(matches!(
            solve_quote(&pool, Outcome::Yes, Decimal::ZERO, dec!(0.001), &config),
            Err(MarketError::InvalidAmount(_))
        ));
        assert!(matches!(
            solve_quote(&pool, Outcome::Yes, dec!(10), Decimal::ZERO, &config),
            Err(MarketError::InvalidAmount(_))
        ));
    }

    #[test]
    fn unresolvable_target_fails_fast() {
        let pool = pool(dec!(1000), Decimal::ONE);
        // the derivative step is bigger than the whole target
        let config = QuoteConfig {
            derivative_step: dec!(1),
            iteration_margin: 32,
        };
        let result = solve_quote(&pool, Outcome::Yes, dec!(0.5), dec!(0.001), &config);
        assert!(matches!(result, Err(MarketError::QuoteNotConverged { iterations: 0, .. })));
    }

    // flat up to 1, then a cliff no bisection can land just below
    struct Cliff;

    impl SellPricing for Cliff {
        fn calc_sell(&self, _side: Outcome, amount: Decimal) -> Result<Decimal, MarketError> {
            if amount <= Decimal::ONE {
                Ok(amount)
            } else {
                Ok(amount * dec!(1_000_000_000_000))
            }
        }
    }

    #[test]
    fn exhausted_budget_reports_not_converged() {
        let config = QuoteConfig {
            derivative_step: dec!(0.001),
            iteration_margin: 4,
        };
        let result = solve_quote(&Cliff, Outcome::Yes, dec!(2), dec!(0.01), &config);
        // halvings(2, 0.01) = 8, plus the margin
        assert!(matches!(result, Err(MarketError::QuoteNotConverged { iterations: 12, .. })));
    }

    #[test]
    fn target_beyond_depth_still_converges() {
        let pool = pool(dec!(100), Decimal::ONE);
        let quote = solve_quote(&pool, Outcome::Yes, dec!(500), dec!(0.01), &QuoteConfig::default()).unwrap();
        assert!(quote.collateral < dec!(100));
        assert!(dec!(500) - quote.tokens <= dec!(0.01));
    }

    #[test]
    fn halvings_count() {
        assert_eq!(halvings(dec!(8), dec!(1)), 3);
        assert_eq!(halvings(dec!(9), dec!(1)), 4);
        assert_eq!(halvings(dec!(0.5), dec!(1)), 0);
    }
}

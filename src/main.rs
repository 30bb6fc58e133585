//! Constant product market maker simulation.
//!
//! Runs the same volume through three markets with different betting behavior to
//! show how impermanent loss eats into fee income, then solves a sell quote.

use cpmm_core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("Constant Product Market Maker Simulation");
    println!("Binary Outcome, Single Pool\n");

    scenario_1_single_trade();
    scenario_2_lp_outcomes();
    scenario_3_fee_reinvestment();
    scenario_4_quote();

    println!("\nAll simulations completed successfully.");
}

/// One buy against a fresh 50:50 pool.
fn scenario_1_single_trade() {
    println!("Scenario 1: Single Trade\n");

    let mut market = Market::new(MarketConfig::no_fee()).unwrap();
    market.create_even_event(dec!(1000)).unwrap();
    let trade = market.buy_token(Outcome::Yes, dec!(100)).unwrap();

    let pool = market.pool();
    println!("  Buy YES for 100: {:.3} tokens @ {:.4}", trade.tokens_returned, trade.realized_price);
    println!("  Slippage {:.4}%", trade.slippage * dec!(100));
    println!("  Reserves: {:.3} YES, {:.3} NO, k = {:.3}\n", pool.lp_yes, pool.lp_no, pool.product());
}

/// Loss, break even and profit markets: same liquidity and fees, different NO:YES odds.
fn scenario_2_lp_outcomes() {
    println!("Scenario 2: LP Outcomes\n");

    let initial_liquidity = dec!(1_000_000);
    for (label, no_odds) in [("loss", dec!(8)), ("break even", dec!(3.39)), ("profit", dec!(1.5))] {
        let market = run_market(initial_liquidity, dec!(0.03), dec!(16), no_odds, dec!(0.02), Decimal::ZERO);
        let pool = market.pool();
        let profit = market.lp_profit().unwrap();

        println!(
            "  {} market: fees {:.0}, IL {:.0}, LP profit {:.3}%",
            label,
            pool.fee_pool,
            pool.calc_impermanent_loss().unwrap(),
            profit * dec!(100) / initial_liquidity
        );
        println!("    {} operations recorded", market.history().len());
    }
    println!();
}

/// Half of every fee goes back into the pool before the trade.
fn scenario_3_fee_reinvestment() {
    println!("Scenario 3: Fee Reinvestment\n");

    let initial_liquidity = dec!(1_000_000);
    let kept = run_market(initial_liquidity, dec!(0.03), dec!(4), dec!(3), dec!(0.02), Decimal::ZERO);
    let reinvested = run_market(initial_liquidity, dec!(0.03), dec!(4), dec!(3), dec!(0.02), dec!(0.5));

    for (label, market) in [("fees kept", &kept), ("50% reinvested", &reinvested)] {
        let pool = market.pool();
        println!(
            "  {}: liquidity {:.0}, fee pool {:.0}, LP profit {:.0}",
            label,
            pool.liquidity,
            pool.fee_pool,
            market.lp_profit().unwrap()
        );
    }
    println!();
}

/// Bisection for the collateral that sells 100 NO tokens out of a 70:100 pool.
fn scenario_4_quote() {
    println!("Scenario 4: Quote\n");

    let mut market = Market::new(MarketConfig::with_fee(dec!(0.01))).unwrap();
    market.create_event(dec!(1000), dec!(0.7)).unwrap();

    let pool = market.pool();
    let marginal = pool.calc_marginal_price(Outcome::No);
    let quote = market.quote(Outcome::No, dec!(100), dec!(0.001)).unwrap();

    println!("  Marginal NO price {:.4}", marginal);
    println!("  Quote {:.6} for 100 NO, delivers {:.6}", quote.collateral, quote.tokens);
    println!("  Short by {:.6} after {} iterations", dec!(100) - quote.tokens, quote.iterations);
}

/// Alternate YES and NO buys until `max_turnover` times the liquidity has traded.
fn run_market(
    initial_liquidity: Decimal,
    fee_fraction: Decimal,
    max_turnover: Decimal,
    no_odds: Decimal,
    max_slippage: Decimal,
    fee_to_liquidity: Decimal,
) -> Market {
    let config = MarketConfig::reinvesting(fee_fraction, fee_to_liquidity);
    let mut market = Market::new(config).unwrap();
    market.create_even_event(initial_liquidity).unwrap();

    let yes_amount = initial_liquidity * max_slippage;
    let no_amount = yes_amount * no_odds;
    let steps = (max_turnover * initial_liquidity / (yes_amount + no_amount)).floor();

    let mut step = Decimal::ONE;
    while step <= steps {
        market.buy_token(Outcome::Yes, yes_amount).unwrap();
        market.buy_token(Outcome::No, no_amount).unwrap();
        step += Decimal::ONE;
    }
    market
}

// 8.0 engine/core.rs: market session. owns one pool and its history log.
// mutating calls run against a staged copy and commit only when every check passed,
// so a rejected operation leaves no trace in either.

use super::results::{InvariantKind, MarketError};
use crate::config::{MarketConfig, QuoteConfig};
use crate::history::{HistoryEntry, HistoryLog};
use crate::pool::PoolState;
use crate::types::{Activity, EntrySide};
use rust_decimal::Decimal;

/** 8.1: market struct. all state lives here, exclusively owned by the session */
#[derive(Debug, Clone)]
pub struct Market {
    pub(super) config: MarketConfig,
    pub(super) quote_config: QuoteConfig,
    pub(super) pool: PoolState,
    pub(super) history: HistoryLog,
}

impl Market {
    pub fn new(config: MarketConfig) -> Result<Self, MarketError> {
        config.validate()?;
        let pool = PoolState::new(&config);
        Ok(Self {
            config,
            quote_config: QuoteConfig::default(),
            pool,
            history: HistoryLog::new(),
        })
    }

    pub fn with_quote_config(mut self, quote_config: QuoteConfig) -> Result<Self, MarketError> {
        quote_config.validate()?;
        self.quote_config = quote_config;
        Ok(self)
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn quote_config(&self) -> &QuoteConfig {
        &self.quote_config
    }

    // read side of the pool. all calc_* analytics hang off this
    pub fn pool(&self) -> &PoolState {
        &self.pool
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Fees collected minus impermanent loss: what LPs made on the session so far.
    pub fn lp_profit(&self) -> Result<Decimal, MarketError> {
        Ok(self.pool.fee_pool - self.pool.calc_impermanent_loss()?)
    }

    pub(super) fn stage(&self) -> Staged {
        Staged {
            pool: self.pool.clone(),
            entries: Vec::new(),
            next_sequence: self.history.next_sequence(),
            ratio_tolerance: self.config.ratio_tolerance,
        }
    }

    pub(super) fn commit(&mut self, staged: Staged) {
        self.pool = staged.pool;
        self.history.extend(staged.entries);
    }
}

/// Working copy for one mutating call. dropped on error, committed on success.
#[derive(Debug)]
pub(super) struct Staged {
    pub(super) pool: PoolState,
    pub(super) entries: Vec<HistoryEntry>,
    pub(super) next_sequence: u64,
    pub(super) ratio_tolerance: Decimal,
}

/// Per-operation figures of one history record. The pool columns come from the staged pool.
#[derive(Debug, Clone, Copy)]
pub(super) struct Fill {
    pub(super) amount: Decimal,
    pub(super) fee: Decimal,
    pub(super) price: Decimal,
    pub(super) slippage: Decimal,
    pub(super) tokens_returned: Decimal,
}

// |actual - expected| may reach the tolerance but not exceed it
pub(super) fn check_invariant(
    kind: InvariantKind,
    expected: Decimal,
    actual: Decimal,
    tolerance: Decimal,
) -> Result<(), MarketError> {
    if (actual - expected).abs() > tolerance {
        return Err(MarketError::InvariantViolation {
            kind,
            expected,
            actual,
            tolerance,
        });
    }
    Ok(())
}

impl Staged {
    // snapshot of the post-operation pool plus derived analytics
    pub(super) fn record(&mut self, activity: Activity, side: EntrySide, fill: Fill) -> Result<(), MarketError> {
        let impermanent_loss = self.pool.calc_impermanent_loss()?;
        let outstanding = self.pool.calc_outstanding_token();

        self.entries.push(HistoryEntry {
            sequence: self.next_sequence,
            activity,
            side,
            amount: fill.amount,
            fee: fill.fee,
            price: fill.price,
            slippage: fill.slippage,
            tokens_returned: fill.tokens_returned,
            lp_yes: self.pool.lp_yes,
            lp_no: self.pool.lp_no,
            lp_token: self.pool.lp_token,
            liquidity: self.pool.liquidity,
            fee_pool: self.pool.fee_pool,
            impermanent_loss,
            outstanding_side: outstanding.side,
            outstanding_amount: outstanding.amount,
        });
        self.next_sequence += 1;
        Ok(())
    }
}

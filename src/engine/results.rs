// 8.0.2: result types and errors for market operations.

use crate::config::ConfigError;
use crate::types::Outcome;
use rust_decimal::Decimal;
use std::fmt;

// Returned by create_event and add_liquidity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityResult {
    // side the surplus was credited to as outstanding tokens
    pub side: Outcome,
    pub tokens_returned: Decimal,
}

// Returned by buy_token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeResult {
    pub side: Outcome,
    pub tokens_returned: Decimal,
    pub fee: Decimal,
    pub realized_price: Decimal,
    pub slippage: Decimal,
}

// Returned by the quote solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteResult {
    // collateral to put in
    pub collateral: Decimal,
    // outcome tokens that collateral moves, never above the target
    pub tokens: Decimal,
    pub iterations: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantKind {
    ConstantProduct,
    Ratio,
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantKind::ConstantProduct => write!(f, "constant product"),
            InvariantKind::Ratio => write!(f, "yes:no ratio"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarketError {
    #[error("Pool is not initialized, create the event first")]
    UninitializedPool,

    #[error("Event already created")]
    AlreadyInitialized,

    #[error("Amount {0} must be positive")]
    InvalidAmount(Decimal),

    #[error("Yes to no ratio {0} must be positive")]
    InvalidRatio(Decimal),

    #[error("Amount {amount} on {side} exceeds pool depth")]
    InsufficientDepth { side: Outcome, amount: Decimal },

    #[error("{kind} invariant violated: expected {expected}, got {actual}, tolerance {tolerance}")]
    InvariantViolation {
        kind: InvariantKind,
        expected: Decimal,
        actual: Decimal,
        tolerance: Decimal,
    },

    #[error("Non positive slippage {slippage} buying {side} with {amount}")]
    NonPositiveSlippage {
        side: Outcome,
        amount: Decimal,
        slippage: Decimal,
    },

    #[error("Negative impermanent loss {0}")]
    NegativeImpermanentLoss(Decimal),

    #[error("Quote for {target} tokens did not converge within {approx_eps} after {iterations} iterations")]
    QuoteNotConverged {
        target: Decimal,
        approx_eps: Decimal,
        iterations: u32,
    },

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl MarketError {
    // numerical or accounting bugs, as opposed to bad input or a hard quote
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MarketError::InvariantViolation { .. }
                | MarketError::NonPositiveSlippage { .. }
                | MarketError::NegativeImpermanentLoss(_)
        )
    }
}

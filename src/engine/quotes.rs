//! Quotes against the live pool. Read-only, never touches reserves or history.

use super::core::Market;
use super::results::{MarketError, QuoteResult};
use crate::quote::solve_quote;
use crate::types::Outcome;
use rust_decimal::Decimal;
use tracing::{debug, warn};

impl Market {
    /// Collateral that moves `target_tokens` of `side`, within `approx_eps` below the target.
    pub fn quote(&self, side: Outcome, target_tokens: Decimal, approx_eps: Decimal) -> Result<QuoteResult, MarketError> {
        if !self.pool.is_initialized() {
            return Err(MarketError::UninitializedPool);
        }

        match solve_quote(&self.pool, side, target_tokens, approx_eps, &self.quote_config) {
            Ok(quote) => {
                debug!(
                    market = %self.config.name,
                    %side,
                    target = %target_tokens,
                    collateral = %quote.collateral,
                    iterations = quote.iterations,
                    "quote solved"
                );
                Ok(quote)
            }
            Err(e) => {
                warn!(market = %self.config.name, %side, target = %target_tokens, error = %e, "quote failed");
                Err(e)
            }
        }
    }
}

// 8.0: market engine. one session owns one pool and its history.
// liquidity adds and buys mutate through a staged copy; quotes only read.

mod core;
mod liquidity;
mod quotes;
mod results;
mod trades;

pub use self::core::Market;
pub use results::{InvariantKind, LiquidityResult, MarketError, QuoteResult, TradeResult};

// cpmm-core: binary outcome constant product market maker.
// invariant-first architecture: every mutation re-checks the pool math before it commits.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Outcome, Activity, EntrySide
//   2.x  pool.rs: pool ledger, ratio preserving add
//   3.x  analytics.rs: calc_buy/sell, marginal price, slippage, LP accounting
//   4.x  history.rs: append-only operation records
//   5.x  quote.rs: bisection quote solver over a SellPricing black box
//   7.x  config.rs: fees, tolerances, solver settings
//   8.x  engine/: market session: create, add liquidity, buy, quote

pub mod analytics;
pub mod config;
pub mod engine;
pub mod history;
pub mod pool;
pub mod quote;
pub mod types;

// re exports for convenience
pub use analytics::*;
pub use config::{ConfigError, MarketConfig, QuoteConfig};
pub use engine::*;
pub use history::*;
pub use pool::*;
pub use quote::{solve_quote, SellPricing};
pub use types::*;

// 4.0: every mutating call leaves exactly one record per pool change. read by external
// reporting after a session or at checkpoints. records are never edited once pushed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Activity, EntrySide, Outcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    // position in the total order of operations on the pool, from 0
    pub sequence: u64,
    pub activity: Activity,
    pub side: EntrySide,
    pub amount: Decimal,
    pub fee: Decimal,
    // realized price for buys, yes:no ratio for liquidity adds
    pub price: Decimal,
    pub slippage: Decimal,
    pub tokens_returned: Decimal,
    pub lp_yes: Decimal,
    pub lp_no: Decimal,
    pub lp_token: Decimal,
    pub liquidity: Decimal,
    pub fee_pool: Decimal,
    pub impermanent_loss: Decimal,
    pub outstanding_side: Outcome,
    pub outstanding_amount: Decimal,
}

impl HistoryEntry {
    /// Bumped whenever a field is added, removed or reordered.
    pub const SCHEMA_VERSION: u16 = 1;

    /// Field order for tabular export. Matches declaration order above.
    pub const COLUMNS: [&'static str; 16] = [
        "sequence",
        "activity",
        "side",
        "amount",
        "fee",
        "price",
        "slippage",
        "tokens_returned",
        "lp_yes",
        "lp_no",
        "lp_token",
        "liquidity",
        "fee_pool",
        "impermanent_loss",
        "outstanding_side",
        "outstanding_amount",
    ];
}

// Append-only record store. only the engine pushes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    // records from `sequence` onwards, for checkpointed readers
    pub fn since(&self, sequence: u64) -> &[HistoryEntry] {
        let start = usize::try_from(sequence).unwrap_or(usize::MAX).min(self.entries.len());
        &self.entries[start..]
    }

    pub(crate) fn next_sequence(&self) -> u64 {
        self.entries.len() as u64
    }

    pub(crate) fn extend(&mut self, staged: Vec<HistoryEntry>) {
        self.entries.extend(staged);
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

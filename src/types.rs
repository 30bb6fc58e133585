// 1.0: primitives shared by every module. outcome sides, history activity kinds.
// amounts stay raw Decimal: collateral and outcome tokens trade 1:1 at creation,
// so a newtype per unit buys nothing but conversions.

use serde::{Deserialize, Serialize};
use std::fmt;

// YES pays out if the event happens, NO if it doesn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    pub fn opposite(&self) -> Self {
        match self {
            Outcome::Yes => Outcome::No,
            Outcome::No => Outcome::Yes,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Yes => write!(f, "yes"),
            Outcome::No => write!(f, "no"),
        }
    }
}

// 1.1: which kind of call produced a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Add,
    Buy,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activity::Add => write!(f, "add"),
            Activity::Buy => write!(f, "buy"),
        }
    }
}

// 1.2: side column of a history record. liquidity adds are not tied to an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySide {
    Yes,
    No,
    Liquidity,
}

impl From<Outcome> for EntrySide {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Yes => EntrySide::Yes,
            Outcome::No => EntrySide::No,
        }
    }
}

impl fmt::Display for EntrySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntrySide::Yes => write!(f, "yes"),
            EntrySide::No => write!(f, "no"),
            EntrySide::Liquidity => write!(f, "liquidity"),
        }
    }
}

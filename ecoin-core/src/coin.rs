use crate::error::LedgerError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two-valued outcome space of a coin toss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub fn other(self) -> Self {
        match self {
            CoinSide::Heads => CoinSide::Tails,
            CoinSide::Tails => CoinSide::Heads,
        }
    }
}

impl FromStr for CoinSide {
    type Err = LedgerError;

    // "h"/"t" are accepted as aliases of the long forms
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "heads" | "h" => Ok(CoinSide::Heads),
            "tails" | "t" => Ok(CoinSide::Tails),
            _ => Err(LedgerError::invalid_side(s)),
        }
    }
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinSide::Heads => write!(f, "heads"),
            CoinSide::Tails => write!(f, "tails"),
        }
    }
}

/// Source of coin-toss outcomes. Production uses [`FairCoin`]; tests inject
/// deterministic implementations.
pub trait CoinToss: Send + Sync {
    fn toss(&self) -> CoinSide;
}

/// Fair 50/50 coin, independent of whatever side was called.
#[derive(Debug, Default)]
pub struct FairCoin;

impl CoinToss for FairCoin {
    fn toss(&self) -> CoinSide {
        if rand::thread_rng().gen::<bool>() {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        }
    }
}

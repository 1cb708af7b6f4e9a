//! E-Coin core - the ledger behind the coin-toss betting bot.
//!
//! One component, the [`LedgerService`], owns every balance transition:
//! account registration, wager settlement and leaderboard reads. It runs
//! against a local sqlite store and an injected coin-toss source.

pub mod coin;
pub mod error;
pub mod ledger;
pub mod storage;
pub mod types;

pub use coin::{CoinSide, CoinToss, FairCoin};
pub use error::{LedgerError, Result};
pub use ledger::LedgerService;
pub use storage::{AccountStore, Storage};
pub use types::{Account, BetReceipt, Registration, INITIAL_BALANCE};

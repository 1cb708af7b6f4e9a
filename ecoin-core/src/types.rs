use crate::coin::CoinSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Balance granted on first registration.
pub const INITIAL_BALANCE: i64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            balance: INITIAL_BALANCE,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Outcome of a registration call. `created` is false on repeat calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub created: bool,
    pub balance: i64,
}

/// Settled wager, sufficient for the caller to render a result message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetReceipt {
    pub side: CoinSide,
    pub outcome: CoinSide,
    pub won: bool,
    pub amount: i64,
    pub new_balance: i64,
}

use crate::coin::{CoinSide, CoinToss};
use crate::error::{LedgerError, Result};
use crate::storage::{AccountStore, Storage};
use crate::types::{Account, BetReceipt, Registration};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Owns all balance state transitions: registration, wager settlement and
/// leaderboard reads. Constructed once at process start with its storage and
/// coin injected; no global state.
pub struct LedgerService {
    storage: Arc<Storage>,
    coin: Arc<dyn CoinToss>,
    // One settlement lock per account so read-modify-write of a balance
    // cannot interleave for the same user (lost-update anomaly).
    settlement_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl LedgerService {
    pub fn new(storage: Arc<Storage>, coin: Arc<dyn CoinToss>) -> Self {
        Self {
            storage,
            coin,
            settlement_locks: Mutex::new(HashMap::new()),
        }
    }

    fn account_lock(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.settlement_locks.lock();
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Creates the account with the initial grant on first contact.
    /// Idempotent: repeat calls report `created = false` and leave the
    /// balance untouched.
    pub async fn register(&self, user_id: &str) -> Result<Registration> {
        let store = AccountStore::new(&self.storage);

        let account = Account::new(user_id);
        let created = store.insert_if_absent(&account).await?;

        if created {
            tracing::info!("Created account {} with balance {}", user_id, account.balance);
            return Ok(Registration {
                created: true,
                balance: account.balance,
            });
        }

        let existing = store
            .get(user_id)
            .await?
            .ok_or_else(|| LedgerError::internal("Account vanished during registration"))?;

        Ok(Registration {
            created: false,
            balance: existing.balance,
        })
    }

    pub async fn balance(&self, user_id: &str) -> Result<i64> {
        let store = AccountStore::new(&self.storage);

        let account = store
            .get(user_id)
            .await?
            .ok_or_else(|| LedgerError::account_not_found(user_id))?;

        Ok(account.balance)
    }

    /// Validates the wager, resolves one fair coin toss and settles the
    /// balance. Validation order is fixed: amount, account, funds.
    pub async fn place_bet(&self, user_id: &str, amount: i64, side: CoinSide) -> Result<BetReceipt> {
        if amount <= 0 {
            return Err(LedgerError::invalid_amount(amount.to_string()));
        }

        let lock = self.account_lock(user_id);
        let _guard = lock.lock().await;

        let store = AccountStore::new(&self.storage);
        let account = store
            .get(user_id)
            .await?
            .ok_or_else(|| LedgerError::account_not_found(user_id))?;

        if amount > account.balance {
            return Err(LedgerError::InsufficientBalance {
                need: amount,
                available: account.balance,
            });
        }

        // The toss is independent of the side called
        let outcome = self.coin.toss();
        let won = side == outcome;
        let new_balance = if won {
            account.balance + amount
        } else {
            account.balance - amount
        };

        store.set_balance(user_id, new_balance).await?;

        tracing::debug!(
            "Settled bet for {}: {} on {}, coin landed {}, balance {} -> {}",
            user_id,
            amount,
            side,
            outcome,
            account.balance,
            new_balance
        );

        Ok(BetReceipt {
            side,
            outcome,
            won,
            amount,
            new_balance,
        })
    }

    /// Up to `limit` accounts, richest first. Empty when nobody registered.
    pub async fn top_balances(&self, limit: usize) -> Result<Vec<Account>> {
        let store = AccountStore::new(&self.storage);
        store.top_balances(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::INITIAL_BALANCE;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// Always lands on the given side.
    struct FixedCoin(CoinSide);

    impl CoinToss for FixedCoin {
        fn toss(&self) -> CoinSide {
            self.0
        }
    }

    /// Plays back a fixed sequence of outcomes.
    struct ScriptedCoin(Mutex<VecDeque<CoinSide>>);

    impl ScriptedCoin {
        fn new(outcomes: &[CoinSide]) -> Self {
            Self(Mutex::new(outcomes.iter().copied().collect()))
        }
    }

    impl CoinToss for ScriptedCoin {
        fn toss(&self) -> CoinSide {
            self.0.lock().pop_front().expect("coin script exhausted")
        }
    }

    /// Heads, tails, heads, tails, ...
    struct AlternatingCoin(AtomicUsize);

    impl CoinToss for AlternatingCoin {
        fn toss(&self) -> CoinSide {
            if self.0.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                CoinSide::Heads
            } else {
                CoinSide::Tails
            }
        }
    }

    async fn new_service(dir: &tempfile::TempDir, coin: Arc<dyn CoinToss>) -> LedgerService {
        let storage = Arc::new(Storage::new(&dir.path().join("ecoin.db")).await.unwrap());
        LedgerService::new(storage, coin)
    }

    #[tokio::test]
    async fn test_registration_is_idempotent() {
        let dir = tempdir().unwrap();
        let service = new_service(&dir, Arc::new(FixedCoin(CoinSide::Heads))).await;

        let first = service.register("7").await.unwrap();
        assert!(first.created);
        assert_eq!(first.balance, INITIAL_BALANCE);

        let second = service.register("7").await.unwrap();
        assert!(!second.created);
        assert_eq!(second.balance, INITIAL_BALANCE);

        assert_eq!(service.balance("7").await.unwrap(), INITIAL_BALANCE);
    }

    #[tokio::test]
    async fn test_balance_of_unregistered_user() {
        let dir = tempdir().unwrap();
        let service = new_service(&dir, Arc::new(FixedCoin(CoinSide::Heads))).await;

        let err = service.balance("stranger").await.unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound { .. }));
    }

    #[tokio::test]
    async fn test_forced_outcome_scenario() {
        let dir = tempdir().unwrap();
        let coin = Arc::new(ScriptedCoin::new(&[CoinSide::Heads, CoinSide::Heads]));
        let service = new_service(&dir, coin).await;

        service.register("a").await.unwrap();

        let win = service.place_bet("a", 500, CoinSide::Heads).await.unwrap();
        assert!(win.won);
        assert_eq!(win.outcome, CoinSide::Heads);
        assert_eq!(win.new_balance, 10_500);

        let loss = service.place_bet("a", 600, CoinSide::Tails).await.unwrap();
        assert!(!loss.won);
        assert_eq!(loss.new_balance, 9_900);
    }

    #[tokio::test]
    async fn test_settlement_conserves_the_amount() {
        let dir = tempdir().unwrap();
        let coin = Arc::new(FixedCoin(CoinSide::Heads));
        let service = new_service(&dir, coin).await;

        service.register("a").await.unwrap();

        let before = service.balance("a").await.unwrap();
        let receipt = service.place_bet("a", 777, CoinSide::Heads).await.unwrap();
        assert_eq!((receipt.new_balance - before).abs(), 777);
        assert_eq!(receipt.new_balance - before > 0, receipt.won);

        let before = receipt.new_balance;
        let receipt = service.place_bet("a", 333, CoinSide::Tails).await.unwrap();
        assert_eq!((receipt.new_balance - before).abs(), 333);
        assert!(!receipt.won);
    }

    #[tokio::test]
    async fn test_bet_validation() {
        let dir = tempdir().unwrap();
        let service = new_service(&dir, Arc::new(FixedCoin(CoinSide::Heads))).await;

        service.register("a").await.unwrap();

        let err = service.place_bet("a", 0, CoinSide::Heads).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        let err = service.place_bet("a", -5, CoinSide::Heads).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        let err = service
            .place_bet("nobody", 100, CoinSide::Heads)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound { .. }));
    }

    #[tokio::test]
    async fn test_insufficient_balance_boundary() {
        let dir = tempdir().unwrap();
        // Forced loss so the all-in bet drains the account
        let service = new_service(&dir, Arc::new(FixedCoin(CoinSide::Tails))).await;

        service.register("a").await.unwrap();

        let err = service
            .place_bet("a", INITIAL_BALANCE + 1, CoinSide::Heads)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance {
                need,
                available
            } if need == INITIAL_BALANCE + 1 && available == INITIAL_BALANCE
        ));

        // Betting exactly the balance is allowed
        let receipt = service
            .place_bet("a", INITIAL_BALANCE, CoinSide::Heads)
            .await
            .unwrap();
        assert!(!receipt.won);
        assert_eq!(receipt.new_balance, 0);

        let err = service.place_bet("a", 1, CoinSide::Heads).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    }

    #[tokio::test]
    async fn test_leaderboard_ordering() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(Storage::new(&dir.path().join("ecoin.db")).await.unwrap());
        let service = LedgerService::new(storage.clone(), Arc::new(FixedCoin(CoinSide::Heads)));

        for id in ["a", "b", "c", "d", "e"] {
            service.register(id).await.unwrap();
        }
        let store = AccountStore::new(&storage);
        for (id, balance) in [("a", 50), ("b", 12_000), ("c", 7_331), ("d", 12_000)] {
            store.set_balance(id, balance).await.unwrap();
        }

        let top = service.top_balances(3).await.unwrap();
        assert_eq!(top.len(), 3);
        for pair in top.windows(2) {
            assert!(pair[0].balance >= pair[1].balance);
        }
        assert_eq!(top[0].id, "b");

        // length = min(limit, account count)
        assert_eq!(service.top_balances(100).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_empty_leaderboard() {
        let dir = tempdir().unwrap();
        let service = new_service(&dir, Arc::new(FixedCoin(CoinSide::Heads))).await;

        assert!(service.top_balances(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_wagers_do_not_lose_updates() {
        let dir = tempdir().unwrap();
        let coin = Arc::new(AlternatingCoin(AtomicUsize::new(0)));
        let service = Arc::new(new_service(&dir, coin).await);

        service.register("a").await.unwrap();

        // 8 concurrent bets of 100 on heads against an alternating coin:
        // 4 wins and 4 losses, so the sequential-equivalent result is the
        // starting balance exactly.
        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.place_bet("a", 100, CoinSide::Heads).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(service.balance("a").await.unwrap(), INITIAL_BALANCE);
    }
}

use crate::error::Result;
use crate::storage::Storage;
use crate::types::Account;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

pub struct AccountStore<'a> {
    storage: &'a Storage,
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        balance: row.get(1)?,
        created_at: chrono::DateTime::from_timestamp(row.get(2)?, 0).unwrap_or_else(Utc::now),
        updated_at: chrono::DateTime::from_timestamp(row.get(3)?, 0).unwrap_or_else(Utc::now),
    })
}

impl<'a> AccountStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Account>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT id, balance, created_at, updated_at
             FROM accounts WHERE id = ?1",
        )?;

        let account = stmt
            .query_row(params![id], account_from_row)
            .optional()?;

        Ok(account)
    }

    /// Inserts the account unless one already exists for the same id.
    /// Returns true when a row was actually inserted.
    pub async fn insert_if_absent(&self, account: &Account) -> Result<bool> {
        let conn = self.storage.get_connection().await;

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO accounts (id, balance, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                account.id,
                account.balance,
                account.created_at.timestamp(),
                account.updated_at.timestamp(),
            ],
        )?;

        Ok(inserted > 0)
    }

    pub async fn set_balance(&self, id: &str, balance: i64) -> Result<()> {
        let conn = self.storage.get_connection().await;

        conn.execute(
            "UPDATE accounts SET balance = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, balance, Utc::now().timestamp()],
        )?;

        Ok(())
    }

    /// Top accounts by balance descending; ties keep insertion order.
    pub async fn top_balances(&self, limit: usize) -> Result<Vec<Account>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT id, balance, created_at, updated_at
             FROM accounts ORDER BY balance DESC, rowid ASC LIMIT ?1",
        )?;

        let account_iter = stmt.query_map(params![limit as i64], account_from_row)?;

        let mut accounts = Vec::new();
        for account in account_iter {
            accounts.push(account?);
        }

        Ok(accounts)
    }

    pub async fn count(&self) -> Result<i64> {
        let conn = self.storage.get_connection().await;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;

        Ok(count)
    }
}

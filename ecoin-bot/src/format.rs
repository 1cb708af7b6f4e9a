//! Reply rendering. Presentation only - the ledger core hands back plain
//! data and every user-facing string lives here.

use comfy_table::{presets::UTF8_FULL, Table};
use ecoin_core::{BetReceipt, LedgerError};

pub fn welcome(created: bool) -> String {
    if created {
        "Welcome to the E-Coin trading bot! You have been credited with 10,000 E-Coins."
            .to_string()
    } else {
        "You have already started using the E-Coin trading bot.".to_string()
    }
}

pub fn balance(balance: i64) -> String {
    format!("Your current balance: {} E-Coins", balance)
}

pub fn bet_result(display_name: &str, receipt: &BetReceipt) -> String {
    if receipt.won {
        format!(
            "🎉 Congratulations {}, the coin has landed on {}. You have successfully won {} E-Coins.\n{} E-Coins have been credited to your balance.",
            display_name, receipt.outcome, receipt.amount, receipt.amount
        )
    } else {
        format!(
            "😕 Oh no {}, the coin has landed on {}. You have lost {} E-Coins.\n{} E-Coins have been deducted from your balance.",
            display_name, receipt.outcome, receipt.amount, receipt.amount
        )
    }
}

pub fn bet_usage() -> String {
    "Invalid command usage. Please use /bet {amount} heads/tails or Bbet {amount} heads/tails"
        .to_string()
}

/// Ranked list of (display name, balance), richest first.
pub fn leaderboard(entries: &[(String, i64)]) -> String {
    if entries.is_empty() {
        return "No users found in the database.".to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Rank", "Player", "Balance (E-Coins)"]);

    for (index, (name, balance)) in entries.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            name.clone(),
            balance.to_string(),
        ]);
    }

    format!("Leaderboard:\n{}", table)
}

pub fn error_reply(err: &LedgerError) -> String {
    match err {
        LedgerError::InvalidAmount(_) => {
            "Invalid bet amount. Please enter a positive integer.".to_string()
        }
        LedgerError::InvalidSide(_) => {
            "Invalid choice. Please choose either heads or tails.".to_string()
        }
        LedgerError::AccountNotFound { .. } => {
            "You haven't started using the E-Coin trading bot yet. Please use /start first."
                .to_string()
        }
        LedgerError::InsufficientBalance { .. } => {
            "Insufficient balance to place this bet.".to_string()
        }
        _ => "Something went wrong. Please try again later.".to_string(),
    }
}

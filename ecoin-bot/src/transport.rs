use crate::commands::{self, Command};
use crate::format;
use ecoin_core::LedgerService;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Rows shown by /leaderboard.
pub const LEADERBOARD_LIMIT: usize = 10;

/// Resolves a human-readable name for a user id. In the real deployment
/// this calls back into the messaging platform once per leaderboard row;
/// it is enrichment only and stays outside the ledger core.
pub trait ProfileLookup: Send + Sync {
    fn display_name(&self, user_id: &str) -> String;
}

/// Console stand-in: the id is the name.
pub struct EchoProfile;

impl ProfileLookup for EchoProfile {
    fn display_name(&self, user_id: &str) -> String {
        user_id.to_string()
    }
}

/// Handles one inbound message and produces the reply, if any.
///
/// Unrecognized text is silently ignored. Every ledger error becomes a
/// user-visible reply; storage failures are additionally logged since they
/// mean infrastructure trouble, not bad input.
pub async fn handle_message(
    service: &LedgerService,
    profiles: &dyn ProfileLookup,
    user_id: &str,
    text: &str,
) -> Option<String> {
    let command = match commands::parse(text)? {
        Ok(command) => command,
        Err(err) => return Some(format::error_reply(&err)),
    };

    let reply = match command {
        Command::Start => service
            .register(user_id)
            .await
            .map(|registration| format::welcome(registration.created)),
        Command::Info => service.balance(user_id).await.map(format::balance),
        Command::Bet { amount, side } => service
            .place_bet(user_id, amount, side)
            .await
            .map(|receipt| format::bet_result(&profiles.display_name(user_id), &receipt)),
        Command::BetUsage => Ok(format::bet_usage()),
        Command::Leaderboard => service.top_balances(LEADERBOARD_LIMIT).await.map(|accounts| {
            let entries: Vec<(String, i64)> = accounts
                .iter()
                .map(|account| (profiles.display_name(&account.id), account.balance))
                .collect();
            format::leaderboard(&entries)
        }),
    };

    match reply {
        Ok(text) => Some(text),
        Err(err) => {
            if err.is_storage() {
                tracing::error!("Storage failure while handling '{}': {}", text, err);
            }
            Some(format::error_reply(&err))
        }
    }
}

/// Single inbound receive loop: reads one command per line from stdin and
/// prints replies to stdout. Ends on EOF.
pub async fn run_console(
    service: Arc<LedgerService>,
    profiles: &dyn ProfileLookup,
    user_id: &str,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if let Some(reply) = handle_message(&service, profiles, user_id, &line).await {
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}

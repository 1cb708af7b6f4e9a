use ecoin_core::{CoinSide, LedgerError};

/// A recognized inbound command. Anything that doesn't parse into one of
/// these shapes is ignored without a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Info,
    Bet { amount: i64, side: CoinSide },
    /// `/bet` with the wrong number of arguments gets a usage hint.
    BetUsage,
    Leaderboard,
}

/// Parses one raw message. `None` means the text matches no recognized
/// command shape; `Some(Err(_))` means a bet command with a bad argument.
///
/// Arguments are validated in fixed order: amount first, then side.
pub fn parse(text: &str) -> Option<Result<Command, LedgerError>> {
    let mut tokens = text.split_whitespace();
    let keyword = tokens.next()?;
    let args: Vec<&str> = tokens.collect();

    match keyword {
        "/start" => Some(Ok(Command::Start)),
        "/info" => Some(Ok(Command::Info)),
        "/leaderboard" | "/lb" => Some(Ok(Command::Leaderboard)),
        "/bet" | "Bbet" => Some(parse_bet(&args)),
        _ => None,
    }
}

fn parse_bet(args: &[&str]) -> Result<Command, LedgerError> {
    if args.len() != 2 {
        return Ok(Command::BetUsage);
    }

    let amount = parse_amount(args[0])?;
    let side: CoinSide = args[1].parse()?;

    Ok(Command::Bet { amount, side })
}

fn parse_amount(token: &str) -> Result<i64, LedgerError> {
    match token.parse::<i64>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(LedgerError::invalid_amount(token)),
    }
}

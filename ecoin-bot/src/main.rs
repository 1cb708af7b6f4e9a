mod commands;
mod config;
mod format;
mod transport;

use clap::{Parser, Subcommand};
use ecoin_core::{FairCoin, LedgerService, Storage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ecoin")]
#[command(about = "E-Coin betting bot - coin-toss wagers over a persistent ledger")]
#[command(version)]
struct Cli {
    /// Data directory for the ledger database
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session for a single user
    Chat {
        /// User identifier
        user_id: String,
    },
    /// Handle one raw message and print the reply, if any
    Exec {
        /// User identifier
        user_id: String,
        /// Raw message text, e.g. "/bet 500 heads"
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "ecoin_bot={},ecoin_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::CliConfig::load(cli.data_dir, cli.verbose);
    tokio::fs::create_dir_all(&config.data_dir).await?;

    // Open the store and wire up the ledger; the connection closes when the
    // service is dropped at process exit.
    let storage = Arc::new(Storage::new(&config.data_dir.join("ecoin.db")).await?);
    let service = Arc::new(LedgerService::new(storage, Arc::new(FairCoin)));
    let profiles = transport::EchoProfile;

    let result = match cli.command {
        Commands::Chat { user_id } => transport::run_console(service, &profiles, &user_id).await,
        Commands::Exec { user_id, text } => {
            if let Some(reply) =
                transport::handle_message(&service, &profiles, &user_id, &text).await
            {
                println!("{}", reply);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

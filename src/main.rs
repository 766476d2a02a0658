//! hedera-starter
//!
//! Runs the ledger demo scenarios against a public network or a local node.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI (clap)
//!     → config (TOML + env and .env overlay + validation)
//!     → observability::logging
//!     → lifecycle::startup (client, explorer)
//!     → scenarios::{consensus, contract, token, account}
//!         → ledger (transactions, queries, subscriptions)
//!             → transport (tonic gRPC to consensus and mirror nodes)
//!     → client.close()
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use hedera_starter::config::loader::DEFAULT_ENV_FILE;
use hedera_starter::config::load_config;
use hedera_starter::ledger::Hbar;
use hedera_starter::lifecycle::startup::build_context;
use hedera_starter::observability::logging::init_logging;
use hedera_starter::scenarios;

#[derive(Parser)]
#[command(name = "hedera-starter")]
#[command(about = "Ledger demo scenarios: consensus, contracts, and tokens", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dotenv file with ACCOUNT_ID, PRIVATE_KEY_HEX, and NETWORK
    #[arg(short, long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Network to use; overrides NETWORK and the config file
    #[arg(short, long)]
    network: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a topic, subscribe to it, and submit a message
    Consensus,
    /// Deploy the lookup contract, then call and execute it
    Contract {
        /// Compiled bytecode file
        #[arg(short, long)]
        bytecode: Option<PathBuf>,
    },
    /// Create a treasury account and an NFT collection, then mint
    Token,
    /// Create an account for a freshly generated key
    Account {
        /// Initial balance in hbars
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        balance: Hbar,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref(), &cli.env_file, cli.network.as_deref())?;
    init_logging(Some(&config.observability.log_level));
    tracing::debug!(
        config_file = ?cli.config,
        env_file = %cli.env_file.display(),
        "Configuration loaded"
    );

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        network = %config.network.name,
        "hedera-starter starting"
    );

    if let Commands::Contract {
        bytecode: Some(path),
    } = &cli.command
    {
        config.contract.bytecode_path = path.display().to_string();
    }

    let ctx = build_context(config)?;
    let result = match cli.command {
        Commands::Consensus => scenarios::consensus::run(&ctx).await.map(|_| ()),
        Commands::Contract { .. } => scenarios::contract::run(&ctx).await.map(|_| ()),
        Commands::Token => scenarios::token::run(&ctx).await.map(|_| ()),
        Commands::Account { balance } => scenarios::account::run(&ctx, balance).await.map(|_| ()),
    };
    ctx.client.close();

    result?;
    tracing::info!("Done");
    Ok(())
}

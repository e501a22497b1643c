//! Wrap/Unwrap Points Bot
//!
//! Main entry point. Loads credentials from the env file, connects a signing
//! HTTP provider, prints the account overview and gas option table, then
//! runs the requested number of alternating wrap/unwrap swaps.
//!
//! Usage:
//!   wrap-points-bot --swaps 10 --gas-option 3
//!   wrap-points-bot --swaps 4 --settings config/amoy.toml --env-file .env.amoy
//!
//! Created: 2026-02-03

use alloy::network::EthereumWallet;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use wrap_points_bot::config::{load_config_from_file, RunSettings};
use wrap_points_bot::display::{ConsoleSink, SharedSink};
use wrap_points_bot::execution::{RetryController, SwapAttempt, TransactionMonitor};
use wrap_points_bot::orchestrator::RunOrchestrator;
use wrap_points_bot::reporter::{HttpScoreApi, ScoreReporter};
use wrap_points_bot::types::GasOption;
use wrap_points_bot::AlloyChainClient;

/// Wrap/unwrap swap bot for points accrual
#[derive(Parser)]
#[command(name = "wrap-points-bot")]
struct Args {
    /// Number of swaps to run (odd = wrap, even = unwrap)
    #[arg(short, long, env = "SWAP_COUNT", value_parser = clap::value_parser!(u32).range(1..))]
    swaps: u32,

    /// Gas option: 1 = normal, 2 = 85%, 3 = x2, 4 = x5 (anything else = normal)
    #[arg(short, long, env = "GAS_OPTION", default_value = "1")]
    gas_option: String,

    /// Env file with PRIVATE_KEY, RPC_URL, API_URL
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Optional TOML file overriding protocol settings
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    // .env may also carry SWAP_COUNT / GAS_OPTION, so load it before parsing
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    if let Err(e) = run(args).await {
        error!("❌ Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        fmt().json().with_env_filter(filter).with_target(false).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }
}

async fn run(args: Args) -> Result<()> {
    info!("===================================================================");
    info!("   Wrap/Unwrap Points Bot");
    info!("===================================================================");

    let config = load_config_from_file(&args.env_file)?;
    let settings = match &args.settings {
        Some(path) => {
            info!("Settings loaded from {}", path.display());
            RunSettings::load(path)?
        }
        None => RunSettings::default(),
    };
    let tokens = settings.token_pair()?;
    let amounts = settings.amount_range()?;
    let delay = settings.delay_range()?;

    let signer: PrivateKeySigner = config
        .private_key
        .trim_start_matches("0x")
        .parse()
        .context("Invalid PRIVATE_KEY")?;
    let wallet = signer.address();

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(config.rpc_url.parse().context("Invalid RPC_URL")?);

    let chain_id = provider
        .get_chain_id()
        .await
        .context("Failed to reach RPC endpoint")?;
    if chain_id != settings.chain_id {
        warn!(
            "⚠️  RPC reports chain id {} but settings expect {}",
            chain_id, settings.chain_id
        );
    }
    info!("Connected to chain {} as {}", chain_id, wallet);

    let sink: SharedSink = Arc::new(ConsoleSink);
    let client = Arc::new(AlloyChainClient::new(Arc::new(provider), wallet));
    let api = Arc::new(HttpScoreApi::new(config.api_url.clone(), config.points_url.clone())?);

    let attempt = SwapAttempt::new(
        client,
        tokens,
        settings.gas_limit,
        TransactionMonitor::new(settings.monitor(), sink.clone()),
        ScoreReporter::new(api, settings.chain_id),
    );
    let gas_option = GasOption::from_choice(&args.gas_option);
    let retry = RetryController::new(attempt, settings.retry_policy(), gas_option, amounts);
    let orchestrator = RunOrchestrator::new(retry, delay, settings.live_gas(), sink);

    orchestrator.log_account_overview().await;
    orchestrator.log_gas_options().await;
    info!("⛽ Gas option: {} (x{})", gas_option, gas_option.multiplier());

    let mut rng = StdRng::from_entropy();
    let state = orchestrator.run(args.swaps, &mut rng).await;
    info!("Run complete: {} succeeded", state.tally());

    Ok(())
}

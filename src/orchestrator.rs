//! Run Orchestrator
//!
//! Drives swap indices 1..=N in order: direction alternates starting with a
//! wrap, each index goes through the retry controller, and a failed index
//! never stops the run. Between indices the orchestrator sleeps for a
//! random delay while the live gas display runs.
//!
//! Created: 2026-02-03

use crate::chain::ChainClient;
use crate::display::{wait_with_live_gas, LiveGasSchedule, SharedSink};
use crate::error::ChainError;
use crate::execution::RetryController;
use crate::gas::{format_native, log_option_table};
use crate::types::{AttemptContext, RunState};
use alloy::primitives::U256;
use anyhow::{ensure, Result};
use chrono::Local;
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

/// Inclusive range the inter-swap delay is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Result<Self> {
        ensure!(min <= max, "delay min {:?} exceeds max {:?}", min, max);
        Ok(Self { min, max })
    }

    /// Uniform whole-millisecond draw
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rng.gen_range(min..=max))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(100_000),
            max: Duration::from_millis(240_000),
        }
    }
}

pub struct RunOrchestrator<C: ?Sized> {
    retry: RetryController<C>,
    delay: DelayRange,
    live_gas: LiveGasSchedule,
    sink: SharedSink,
}

impl<C: ChainClient + ?Sized + 'static> RunOrchestrator<C> {
    pub fn new(
        retry: RetryController<C>,
        delay: DelayRange,
        live_gas: LiveGasSchedule,
        sink: SharedSink,
    ) -> Self {
        Self {
            retry,
            delay,
            live_gas,
            sink,
        }
    }

    /// Wallet, balances and points total. Read failures are logged only.
    pub async fn log_account_overview(&self) {
        let attempt = self.retry.attempt();
        let client = attempt.client();
        let tokens = attempt.tokens();
        let wallet = client.wallet_address();

        let (native, source, wrapped) = futures::join!(
            client.native_balance(),
            client.token_balance(tokens.source.address),
            client.token_balance(tokens.wrapped.address),
        );

        info!("===================================================================");
        info!("👛 Wallet: {}", wallet);
        log_balance("POL", native);
        log_balance(&tokens.source.symbol, source);
        log_balance(&tokens.wrapped.symbol, wrapped);
        attempt.reporter().log_total_points(wallet).await;
        info!("===================================================================");
    }

    /// Gas option table at the current network price
    pub async fn log_gas_options(&self) {
        match self.retry.attempt().client().gas_price().await {
            Ok(price) => log_option_table(price),
            Err(e) => warn!("Gas price unavailable, skipping fee table: {}", e),
        }
    }

    /// Run `total` swaps and return the final summary.
    pub async fn run<R>(&self, total: u32, rng: &mut R) -> RunState
    where
        R: Rng + ?Sized,
    {
        let mut state = RunState::new(total);
        info!(
            "🚀 Starting {} swap(s) at {}",
            total,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        for index in 1..=total {
            let ctx = AttemptContext::new(index);
            info!("==================== Swap {}/{} ({}) ====================", index, total, ctx.direction);

            let report = self.retry.run_attempt(ctx, rng).await;
            state = state.record(&report);

            if report.outcome.success {
                info!("✅ Swap {} done ({} so far)", index, state.tally());
            } else {
                warn!(
                    "Swap {} failed after {} submission(s): {}",
                    index,
                    report.submissions,
                    report.outcome.failure_reason.as_deref().unwrap_or("unknown")
                );
            }

            if index < total {
                self.pause_between_swaps(rng).await;
            }
        }

        info!("===================================================================");
        info!("✅ All swaps finished! Success: {}", state.tally());
        let attempt = self.retry.attempt();
        attempt
            .reporter()
            .log_total_points(attempt.client().wallet_address())
            .await;

        state
    }

    async fn pause_between_swaps<R>(&self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let delay = self.delay.sample(rng);
        let wake_at = chrono::Duration::from_std(delay)
            .map(|d| (Local::now() + d).format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| "-".to_string());
        info!("⏳ Next swap in {}s (at {})", delay.as_secs(), wake_at);

        wait_with_live_gas(
            self.retry.attempt().client().clone(),
            self.sink.clone(),
            delay,
            self.live_gas,
        )
        .await;
    }
}

fn log_balance(symbol: &str, balance: Result<U256, ChainError>) {
    match balance {
        Ok(b) => info!("💰 {} balance: {}", symbol, format_native(b)),
        Err(e) => warn!("Could not read {} balance: {}", symbol, e),
    }
}

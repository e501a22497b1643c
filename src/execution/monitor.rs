//! Transaction Monitor
//!
//! Polls for a receipt on a fixed interval until one with a block number
//! shows up or the timeout (measured from a caller-supplied start) elapses.
//! A spinner runs for the duration of the wait and is released on every
//! exit path.

use crate::chain::ChainClient;
use crate::display::{SharedSink, Spinner};
use crate::error::{ErrorClass, SwapError};
use crate::types::{shorten_hash, TxReceipt};
use alloy::primitives::TxHash;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Give up waiting after this long
    pub timeout: Duration,
    /// Delay between receipt polls
    pub poll_interval: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(600_000),
            poll_interval: Duration::from_millis(10_000),
        }
    }
}

#[derive(Clone)]
pub struct TransactionMonitor {
    settings: MonitorSettings,
    sink: SharedSink,
}

impl TransactionMonitor {
    pub fn new(settings: MonitorSettings, sink: SharedSink) -> Self {
        Self { settings, sink }
    }

    pub fn settings(&self) -> MonitorSettings {
        self.settings
    }

    /// Wait for `tx_hash` to be mined.
    ///
    /// Returns the first confirmed receipt, or `SwapError::Timeout` once
    /// `timeout` has elapsed since `started`. Transient poll failures are
    /// treated like a pending receipt; fatal ones end the wait.
    pub async fn wait<C>(
        &self,
        client: &C,
        tx_hash: TxHash,
        started: Instant,
    ) -> Result<TxReceipt, SwapError>
    where
        C: ChainClient + ?Sized,
    {
        let spinner = Spinner::start(
            self.sink.clone(),
            format!("Waiting for confirmation of {}...", shorten_hash(&tx_hash.to_string())),
        );
        let result = self.poll_until_confirmed(client, tx_hash, started).await;
        spinner.stop().await;
        result
    }

    async fn poll_until_confirmed<C>(
        &self,
        client: &C,
        tx_hash: TxHash,
        started: Instant,
    ) -> Result<TxReceipt, SwapError>
    where
        C: ChainClient + ?Sized,
    {
        let mut polls = 0u32;
        loop {
            let waited = started.elapsed();
            if waited >= self.settings.timeout {
                return Err(SwapError::Timeout { tx_hash, waited });
            }

            polls += 1;
            match client.transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) if receipt.is_confirmed() => {
                    debug!("Receipt for {} after {} poll(s)", tx_hash, polls);
                    return Ok(receipt);
                }
                Ok(_) => {}
                Err(e) if e.class() == ErrorClass::Transient => {
                    warn!("Receipt poll failed, still waiting: {}", e);
                }
                Err(e) => return Err(e.into()),
            }

            sleep(self.settings.poll_interval).await;
        }
    }
}

//! Inter-swap wait with live gas price
//!
//! The wake time is fixed up front. A background task refreshes the gas
//! price text on its own interval; the countdown line is redrawn on a shorter
//! tick. Neither can delay or extend the wait.

use super::{format_countdown, SharedSink, SPINNER_FRAMES};
use crate::chain::ChainClient;
use crate::gas::format_gwei;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveGasSchedule {
    /// How often the network gas price is re-fetched
    pub gas_refresh: Duration,
    /// How often the countdown line is redrawn
    pub countdown_tick: Duration,
}

impl Default for LiveGasSchedule {
    fn default() -> Self {
        Self {
            gas_refresh: Duration::from_millis(1_000),
            countdown_tick: Duration::from_millis(100),
        }
    }
}

/// Aborts the refresher if the wait is abandoned
struct RefresherGuard(Option<JoinHandle<()>>);

impl RefresherGuard {
    async fn shutdown(mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for RefresherGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}

/// Sleep for `total`, showing live gas price and remaining time.
pub async fn wait_with_live_gas<C>(
    client: Arc<C>,
    sink: SharedSink,
    total: Duration,
    schedule: LiveGasSchedule,
) where
    C: ChainClient + ?Sized + 'static,
{
    let deadline = Instant::now() + total;
    let (gas_tx, gas_rx) = watch::channel("⛽ Live Gas Price: Loading...".to_string());
    let refresher = RefresherGuard(Some(tokio::spawn(refresh_gas_price(
        client,
        gas_tx,
        schedule.gas_refresh,
    ))));

    let mut countdown = interval(schedule.countdown_tick);
    countdown.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticks = IntervalStream::new(countdown);
    let wake = sleep_until(deadline);
    tokio::pin!(wake);
    let mut frame = 0usize;

    loop {
        tokio::select! {
            biased;
            _ = &mut wake => break,
            Some(_) = ticks.next() => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                let gas_text = gas_rx.borrow().clone();
                sink.render(&format!(
                    "{} {} | Time remaining: {}  ",
                    SPINNER_FRAMES[frame],
                    gas_text,
                    format_countdown(remaining)
                ));
                frame = (frame + 1) % SPINNER_FRAMES.len();
            }
        }
    }

    refresher.shutdown().await;
    sink.clear();
}

async fn refresh_gas_price<C>(client: Arc<C>, gas_tx: watch::Sender<String>, every: Duration)
where
    C: ChainClient + ?Sized + 'static,
{
    let mut refresh = interval(every);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticks = IntervalStream::new(refresh);

    while ticks.next().await.is_some() {
        let text = match client.gas_price().await {
            Ok(price) => format!("⛽ Live Gas Price: {} Gwei", format_gwei(price)),
            Err(e) => {
                debug!("Live gas refresh failed: {}", e);
                format!("⛽ Gas price error: {}", e)
            }
        };
        if gas_tx.send(text).is_err() {
            break;
        }
    }
}

//! Retry Controller
//!
//! Runs one swap index to completion. Transient chain errors are resubmitted
//! after a fixed backoff with a fresh fee quote and a fresh amount; any other
//! error ends the index at once. The direction never changes between
//! submissions of the same index.

use super::amount::AmountRange;
use super::swap::SwapAttempt;
use crate::chain::ChainClient;
use crate::error::SwapError;
use crate::gas::fetch_plan;
use crate::types::{AttemptContext, AttemptReport, GasOption, SwapOutcome};
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound on submissions per index (first try included)
    pub max_submissions: u32,
    /// Pause before resubmitting after a transient failure
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_submissions: 3,
            backoff: Duration::from_millis(3_000),
        }
    }
}

pub struct RetryController<C: ?Sized> {
    attempt: SwapAttempt<C>,
    policy: RetryPolicy,
    gas_option: GasOption,
    amounts: AmountRange,
}

impl<C: ChainClient + ?Sized> RetryController<C> {
    pub fn new(
        attempt: SwapAttempt<C>,
        policy: RetryPolicy,
        gas_option: GasOption,
        amounts: AmountRange,
    ) -> Self {
        Self {
            attempt,
            policy,
            gas_option,
            amounts,
        }
    }

    pub fn attempt(&self) -> &SwapAttempt<C> {
        &self.attempt
    }

    /// Drive one index until success, a fatal error, or the submission cap.
    pub async fn run_attempt<R>(&self, mut ctx: AttemptContext, rng: &mut R) -> AttemptReport
    where
        R: Rng + ?Sized,
    {
        let max = self.policy.max_submissions.max(1);
        let mut submissions = 0u32;

        loop {
            submissions += 1;
            let err = match self.submit_once(&ctx, rng).await {
                Ok(outcome) => {
                    return AttemptReport {
                        context: ctx,
                        submissions,
                        outcome,
                    }
                }
                Err(e) => e,
            };

            if !err.is_transient() {
                error!("❌ Swap {} failed: {}", ctx.index, err);
                return AttemptReport {
                    context: ctx,
                    submissions,
                    outcome: SwapOutcome::failed(err.to_string()),
                };
            }

            ctx.retries_used += 1;
            if submissions >= max {
                error!(
                    "❌ Swap {} failed after {} submissions: {}",
                    ctx.index, submissions, err
                );
                return AttemptReport {
                    context: ctx,
                    submissions,
                    outcome: SwapOutcome::failed(err.to_string()),
                };
            }

            warn!(
                "❌ Network error on swap {} ({}/{}): {}. Retrying in {:?}",
                ctx.index, submissions, max, err, self.policy.backoff
            );
            sleep(self.policy.backoff).await;
        }
    }

    /// One submission: fresh fee quote, fresh amount
    async fn submit_once<R>(&self, ctx: &AttemptContext, rng: &mut R) -> Result<SwapOutcome, SwapError>
    where
        R: Rng + ?Sized,
    {
        let plan = fetch_plan(self.attempt.client().as_ref(), self.gas_option).await?;
        let (amount, units) = self.amounts.sample(rng);
        let intent = self.attempt.intent(ctx.direction, amount, units);

        info!(
            "🔄 Swap {} ({}) | amount {} {}",
            ctx.index, ctx.direction, intent.amount, intent.from.symbol
        );
        self.attempt.run(&intent, &plan).await
    }
}

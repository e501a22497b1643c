//! Swap Attempt
//!
//! One wrap or unwrap, end to end: paused check, balance and allowance
//! (wraps only), submission, confirmation, fee computation, API report.
//! Every on-chain step is awaited to confirmation before the next one is
//! sent, so nothing is ever broadcast on top of an unconfirmed transaction.

use super::monitor::TransactionMonitor;
use crate::chain::ChainClient;
use crate::error::{ErrorClass, SwapError};
use crate::gas::{format_gwei, format_native};
use crate::reporter::ScoreReporter;
use crate::types::{shorten_hash, GasPlan, SwapDirection, SwapIntent, SwapOutcome, TokenPair};
use alloy::primitives::U256;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info};

/// Gas limit ceiling for wrap/unwrap
pub const DEFAULT_SWAP_GAS_LIMIT: u64 = 100_000;

pub struct SwapAttempt<C: ?Sized> {
    client: Arc<C>,
    tokens: TokenPair,
    gas_limit: u64,
    monitor: TransactionMonitor,
    reporter: ScoreReporter,
}

impl<C: ChainClient + ?Sized> SwapAttempt<C> {
    pub fn new(
        client: Arc<C>,
        tokens: TokenPair,
        gas_limit: u64,
        monitor: TransactionMonitor,
        reporter: ScoreReporter,
    ) -> Self {
        Self {
            client,
            tokens,
            gas_limit,
            monitor,
            reporter,
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn tokens(&self) -> &TokenPair {
        &self.tokens
    }

    pub fn reporter(&self) -> &ScoreReporter {
        &self.reporter
    }

    /// Intent for `direction` with the token route filled in
    pub fn intent(&self, direction: SwapDirection, amount: Decimal, amount_units: U256) -> SwapIntent {
        let (from, to) = self.tokens.route(direction);
        SwapIntent {
            direction,
            amount,
            amount_units,
            from: from.clone(),
            to: to.clone(),
        }
    }

    /// Execute one swap at `plan.effective_price`.
    pub async fn run(&self, intent: &SwapIntent, plan: &GasPlan) -> Result<SwapOutcome, SwapError> {
        let wrapper = self.tokens.wrapped.address;

        if self.client.is_paused(wrapper).await? {
            return Err(SwapError::ContractPaused);
        }

        if intent.direction == SwapDirection::Wrap {
            self.ensure_wrap_funds(intent, plan).await?;
        }

        info!(
            "🔄 {}: {} {} -> {} | gas {} Gwei",
            intent.direction,
            intent.amount,
            intent.from.symbol,
            intent.to.symbol,
            format_gwei(plan.effective_price)
        );
        let tx_hash = self
            .client
            .submit_swap(
                wrapper,
                intent.direction,
                intent.amount_units,
                plan.effective_price,
                self.gas_limit,
            )
            .await?;
        info!("✅ Transaction sent: {}", shorten_hash(&tx_hash.to_string()));

        let receipt = self.monitor.wait(self.client.as_ref(), tx_hash, Instant::now()).await?;

        // Fee from the price this transaction was submitted with
        let gas_fee = U256::from(receipt.gas_used) * U256::from(plan.effective_price);

        if !receipt.success {
            error!(
                "❌ Transaction reverted: {} | gas paid {} POL",
                shorten_hash(&tx_hash.to_string()),
                format_native(gas_fee)
            );
            return Err(SwapError::Reverted { tx_hash, gas_fee });
        }

        info!("✅ Transaction confirmed: {}", shorten_hash(&tx_hash.to_string()));
        info!("💸 Gas fee paid: {} POL", format_native(gas_fee));

        let wallet = self.client.wallet_address();
        self.reporter.report(intent, wallet, tx_hash, gas_fee).await?;

        Ok(SwapOutcome {
            success: true,
            tx_hash: Some(tx_hash),
            gas_used: Some(receipt.gas_used),
            gas_fee_paid: Some(gas_fee),
            api_reported: true,
            failure_reason: None,
        })
    }

    /// Source balance check, then allowance top-up (reset to zero first if
    /// a smaller non-zero allowance is already set).
    async fn ensure_wrap_funds(&self, intent: &SwapIntent, plan: &GasPlan) -> Result<(), SwapError> {
        let source = &self.tokens.source;
        let spender = self.tokens.wrapped.address;
        let required = intent.amount_units;

        let balance = self.client.token_balance(source.address).await?;
        if balance < required {
            return Err(SwapError::InsufficientBalance {
                symbol: source.symbol.clone(),
                required,
                available: balance,
            });
        }

        let allowance = self.client.allowance(source.address, spender).await?;
        if allowance >= required {
            return Ok(());
        }

        if !allowance.is_zero() {
            info!("🔓 Resetting {} allowance to 0", source.symbol);
            self.set_allowance(U256::ZERO, required, plan).await?;
        }

        info!("🔓 Approving {} {}", format_native(required), source.symbol);
        self.set_allowance(required, required, plan).await
    }

    async fn set_allowance(&self, amount: U256, required: U256, plan: &GasPlan) -> Result<(), SwapError> {
        let source = self.tokens.source.address;
        let spender = self.tokens.wrapped.address;

        let tx_hash = match self
            .client
            .approve(source, spender, amount, plan.effective_price)
            .await
        {
            Ok(hash) => hash,
            Err(e) if e.class() == ErrorClass::Transient => return Err(e.into()),
            Err(e) => {
                return Err(SwapError::InsufficientAllowance {
                    required,
                    reason: e.to_string(),
                })
            }
        };

        let receipt = self.monitor.wait(self.client.as_ref(), tx_hash, Instant::now()).await?;
        if !receipt.success {
            return Err(SwapError::InsufficientAllowance {
                required,
                reason: format!("approval {} reverted", tx_hash),
            });
        }

        info!("✅ Approval confirmed: {}", shorten_hash(&tx_hash.to_string()));
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::chain::mock::{Call, MockChainClient};
    use crate::display::NullSink;
    use crate::error::ChainError;
    use crate::execution::monitor::MonitorSettings;
    use crate::reporter::testing::RecordingApi;
    use crate::types::{GasOption, TokenInfo};
    use alloy::primitives::{Address, TxHash};

    pub(crate) const SOURCE: Address = Address::new([0x01; 20]);
    pub(crate) const WRAPPED: Address = Address::new([0x02; 20]);
    const GWEI: u128 = 1_000_000_000;

    pub(crate) fn tokens() -> TokenPair {
        TokenPair {
            source: TokenInfo::new(SOURCE, "WPOL"),
            wrapped: TokenInfo::new(WRAPPED, "TPOL"),
        }
    }

    pub(crate) fn attempt(
        client: Arc<MockChainClient>,
        api: Arc<RecordingApi>,
    ) -> SwapAttempt<MockChainClient> {
        SwapAttempt::new(
            client,
            tokens(),
            DEFAULT_SWAP_GAS_LIMIT,
            TransactionMonitor::new(MonitorSettings::default(), Arc::new(NullSink)),
            ScoreReporter::new(api, 137),
        )
    }

    fn plan(price: u128) -> GasPlan {
        GasPlan {
            option: GasOption::Normal,
            effective_price: price,
            floored_to_min_tip: false,
        }
    }

    fn units(n: u64) -> U256 {
        U256::from(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrap_happy_path() {
        let client = Arc::new(MockChainClient::new().with_balance(SOURCE, units(1_000)));
        let api = Arc::new(RecordingApi::default());
        let attempt = attempt(client.clone(), api.clone());
        let intent = attempt.intent(SwapDirection::Wrap, Decimal::new(523, 5), units(500));

        let outcome = attempt.run(&intent, &plan(40 * GWEI)).await.unwrap();

        assert!(outcome.success && outcome.api_reported);
        assert_eq!(outcome.tx_hash, Some(TxHash::with_last_byte(1)));
        assert_eq!(outcome.gas_used, Some(50_000));
        assert_eq!(
            client.calls(),
            vec![
                Call::Swap {
                    direction: SwapDirection::Wrap,
                    amount: units(500),
                    gas_price: 40 * GWEI,
                    gas_limit: 100_000,
                },
                Call::ReceiptPoll(TxHash::with_last_byte(1)),
            ]
        );

        let records = api.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].type_code, 2);
        assert_eq!(records[0].from_token_symbol, "WPOL");
        assert_eq!(records[0].from_amount, "0.00523");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fee_uses_submitted_price() {
        let client = Arc::new(MockChainClient::new());
        let api = Arc::new(RecordingApi::default());
        let attempt = attempt(client, api.clone());
        let intent = attempt.intent(SwapDirection::Unwrap, Decimal::new(200, 5), units(200));

        let outcome = attempt.run(&intent, &plan(33 * GWEI)).await.unwrap();

        let expected = U256::from(50_000u64) * U256::from(33 * GWEI);
        assert_eq!(outcome.gas_fee_paid, Some(expected));
        assert_eq!(api.records()[0].gas_fee_amount, expected.to_string());
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_contract_fails_before_any_send() {
        let client = Arc::new(MockChainClient::new().with_paused(true));
        let api = Arc::new(RecordingApi::default());
        let attempt = attempt(client.clone(), api.clone());
        let intent = attempt.intent(SwapDirection::Wrap, Decimal::new(500, 5), units(1));

        let err = attempt.run(&intent, &plan(GWEI)).await.unwrap_err();

        assert_eq!(err, SwapError::ContractPaused);
        assert!(client.calls().is_empty());
        assert!(api.records().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insufficient_source_balance() {
        let client = Arc::new(MockChainClient::new().with_balance(SOURCE, units(10)));
        let attempt = attempt(client.clone(), Arc::new(RecordingApi::default()));
        let intent = attempt.intent(SwapDirection::Wrap, Decimal::new(500, 5), units(500));

        let err = attempt.run(&intent, &plan(GWEI)).await.unwrap_err();

        assert_eq!(
            err,
            SwapError::InsufficientBalance {
                symbol: "WPOL".into(),
                required: units(500),
                available: units(10),
            }
        );
        assert!(client.swap_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_allowance_is_reset_then_approved() {
        let client = Arc::new(
            MockChainClient::new()
                .with_balance(SOURCE, units(1_000))
                .with_allowance(units(100)),
        );
        let attempt = attempt(client.clone(), Arc::new(RecordingApi::default()));
        let intent = attempt.intent(SwapDirection::Wrap, Decimal::new(500, 5), units(500));

        attempt.run(&intent, &plan(GWEI)).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 6);
        assert_eq!(calls[0], Call::Approve { amount: U256::ZERO, gas_price: GWEI });
        assert_eq!(calls[1], Call::ReceiptPoll(TxHash::with_last_byte(1)));
        assert_eq!(calls[2], Call::Approve { amount: units(500), gas_price: GWEI });
        assert_eq!(calls[3], Call::ReceiptPoll(TxHash::with_last_byte(2)));
        assert!(matches!(calls[4], Call::Swap { .. }));
        assert_eq!(calls[5], Call::ReceiptPoll(TxHash::with_last_byte(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_allowance_approves_once() {
        let client = Arc::new(
            MockChainClient::new()
                .with_balance(SOURCE, units(1_000))
                .with_allowance(U256::ZERO),
        );
        let attempt = attempt(client.clone(), Arc::new(RecordingApi::default()));
        let intent = attempt.intent(SwapDirection::Wrap, Decimal::new(500, 5), units(500));

        attempt.run(&intent, &plan(GWEI)).await.unwrap();

        assert_eq!(client.approve_calls(), vec![Call::Approve { amount: units(500), gas_price: GWEI }]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_approve_is_insufficient_allowance() {
        let client = Arc::new(
            MockChainClient::new()
                .with_balance(SOURCE, units(1_000))
                .with_allowance(U256::ZERO),
        );
        client.push_approve_failure(ChainError::rejected("approve", "insufficient funds for gas * price + value"));
        let attempt = attempt(client.clone(), Arc::new(RecordingApi::default()));
        let intent = attempt.intent(SwapDirection::Wrap, Decimal::new(500, 5), units(500));

        let err = attempt.run(&intent, &plan(GWEI)).await.unwrap_err();

        match &err {
            SwapError::InsufficientAllowance { required, reason } => {
                assert_eq!(*required, units(500));
                assert!(reason.contains("insufficient funds"), "{}", reason);
            }
            other => panic!("expected allowance error, got {:?}", other),
        }
        assert!(!err.is_transient());
        assert_eq!(client.approve_calls().len(), 1);
        assert!(client.swap_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverted_approval_is_insufficient_allowance() {
        // The approval is the first transaction sent
        let client = Arc::new(
            MockChainClient::new()
                .with_balance(SOURCE, units(1_000))
                .with_allowance(U256::ZERO)
                .with_reverted_tx(TxHash::with_last_byte(1)),
        );
        let api = Arc::new(RecordingApi::default());
        let attempt = attempt(client.clone(), api.clone());
        let intent = attempt.intent(SwapDirection::Wrap, Decimal::new(500, 5), units(500));

        let err = attempt.run(&intent, &plan(GWEI)).await.unwrap_err();

        assert!(
            matches!(err, SwapError::InsufficientAllowance { required, .. } if required == units(500)),
            "{:?}",
            err
        );
        assert!(client.swap_calls().is_empty());
        assert!(api.records().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_approve_error_stays_transient() {
        let client = Arc::new(
            MockChainClient::new()
                .with_balance(SOURCE, units(1_000))
                .with_allowance(U256::ZERO),
        );
        client.push_approve_failure(ChainError::network("approve", "connection reset"));
        let attempt = attempt(client.clone(), Arc::new(RecordingApi::default()));
        let intent = attempt.intent(SwapDirection::Wrap, Decimal::new(500, 5), units(500));

        let err = attempt.run(&intent, &plan(GWEI)).await.unwrap_err();

        assert!(err.is_transient());
        assert!(client.swap_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unwrap_skips_source_checks() {
        // No source balance and no allowance: irrelevant for unwrap
        let client = Arc::new(MockChainClient::new().with_allowance(U256::ZERO));
        let attempt = attempt(client.clone(), Arc::new(RecordingApi::default()));
        let intent = attempt.intent(SwapDirection::Unwrap, Decimal::new(500, 5), units(500));

        let outcome = attempt.run(&intent, &plan(GWEI)).await.unwrap();

        assert!(outcome.success);
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverted_swap_is_not_reported() {
        let client = Arc::new(MockChainClient::new().with_reverted());
        let api = Arc::new(RecordingApi::default());
        let attempt = attempt(client, api.clone());
        let intent = attempt.intent(SwapDirection::Unwrap, Decimal::new(500, 5), units(500));

        let err = attempt.run(&intent, &plan(2 * GWEI)).await.unwrap_err();

        assert_eq!(
            err,
            SwapError::Reverted {
                tx_hash: TxHash::with_last_byte(1),
                gas_fee: U256::from(50_000u64) * U256::from(2 * GWEI),
            }
        );
        assert!(api.records().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_api_rejection_is_api_error() {
        let client = Arc::new(MockChainClient::new());
        let api = Arc::new(RecordingApi::default());
        api.push_reply(Err(SwapError::Api("500 Internal Server Error".into())));
        let attempt = attempt(client, api);
        let intent = attempt.intent(SwapDirection::Unwrap, Decimal::new(500, 5), units(500));

        let err = attempt.run(&intent, &plan(GWEI)).await.unwrap_err();
        assert!(matches!(err, SwapError::Api(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_failure_keeps_chain_classification() {
        let client = Arc::new(MockChainClient::new());
        client.push_swap_failure(ChainError::network("unwrap", "connection reset"));
        let attempt = attempt(client, Arc::new(RecordingApi::default()));
        let intent = attempt.intent(SwapDirection::Unwrap, Decimal::new(500, 5), units(500));

        let err = attempt.run(&intent, &plan(GWEI)).await.unwrap_err();
        assert!(err.is_transient());
    }
}

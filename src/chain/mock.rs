//! Scripted in-memory ChainClient for engine tests

use super::ChainClient;
use crate::error::ChainError;
use crate::types::{FeeQuote, SwapDirection, TxReceipt};
use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

/// Every state-changing or polling call the engine made, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Approve { amount: U256, gas_price: u128 },
    Swap { direction: SwapDirection, amount: U256, gas_price: u128, gas_limit: u64 },
    ReceiptPoll(TxHash),
}

pub struct MockChainClient {
    pub wallet: Address,
    fee_quotes: Mutex<VecDeque<Result<FeeQuote, ChainError>>>,
    default_fee: FeeQuote,
    pub paused: Mutex<bool>,
    balances: Mutex<HashMap<Address, U256>>,
    allowance: Mutex<U256>,
    swap_failures: Mutex<VecDeque<ChainError>>,
    approve_failures: Mutex<VecDeque<ChainError>>,
    poll_errors: Mutex<VecDeque<ChainError>>,
    /// Polls returning None before a receipt appears (per transaction)
    pending_polls: u32,
    poll_counts: Mutex<HashMap<TxHash, u32>>,
    reverted: Mutex<bool>,
    reverted_hashes: Mutex<HashSet<TxHash>>,
    gas_price_reads: Mutex<u32>,
    pub gas_used: u64,
    next_hash: Mutex<u8>,
    calls: Mutex<Vec<Call>>,
}

impl MockChainClient {
    pub fn new() -> Self {
        Self {
            wallet: Address::repeat_byte(0xAA),
            fee_quotes: Mutex::new(VecDeque::new()),
            default_fee: FeeQuote {
                base_gas_price: 30_000_000_000,
                min_priority_tip: 25_000_000_000,
            },
            paused: Mutex::new(false),
            balances: Mutex::new(HashMap::new()),
            allowance: Mutex::new(U256::MAX),
            swap_failures: Mutex::new(VecDeque::new()),
            approve_failures: Mutex::new(VecDeque::new()),
            poll_errors: Mutex::new(VecDeque::new()),
            pending_polls: 0,
            poll_counts: Mutex::new(HashMap::new()),
            reverted: Mutex::new(false),
            reverted_hashes: Mutex::new(HashSet::new()),
            gas_price_reads: Mutex::new(0),
            gas_used: 50_000,
            next_hash: Mutex::new(1),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_balance(self, token: Address, balance: U256) -> Self {
        self.balances.lock().unwrap().insert(token, balance);
        self
    }

    pub fn with_allowance(self, allowance: U256) -> Self {
        *self.allowance.lock().unwrap() = allowance;
        self
    }

    pub fn with_paused(self, paused: bool) -> Self {
        *self.paused.lock().unwrap() = paused;
        self
    }

    pub fn with_pending_polls(mut self, polls: u32) -> Self {
        self.pending_polls = polls;
        self
    }

    pub fn with_reverted(self) -> Self {
        *self.reverted.lock().unwrap() = true;
        self
    }

    /// Revert only the receipt of `tx_hash`
    pub fn with_reverted_tx(self, tx_hash: TxHash) -> Self {
        self.reverted_hashes.lock().unwrap().insert(tx_hash);
        self
    }

    /// Queue fee quotes returned by successive `fee_quote` calls
    pub fn push_fee_quote(&self, quote: Result<FeeQuote, ChainError>) {
        self.fee_quotes.lock().unwrap().push_back(quote);
    }

    /// Queue errors returned by successive `submit_swap` calls
    pub fn push_swap_failure(&self, err: ChainError) {
        self.swap_failures.lock().unwrap().push_back(err);
    }

    /// Queue errors returned by successive `approve` calls
    pub fn push_approve_failure(&self, err: ChainError) {
        self.approve_failures.lock().unwrap().push_back(err);
    }

    /// Queue errors returned by successive receipt polls
    pub fn push_poll_error(&self, err: ChainError) {
        self.poll_errors.lock().unwrap().push_back(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn approve_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Approve { .. }))
            .collect()
    }

    pub fn gas_price_reads(&self) -> u32 {
        *self.gas_price_reads.lock().unwrap()
    }

    pub fn swap_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Swap { .. }))
            .collect()
    }

    fn next_tx_hash(&self) -> TxHash {
        let mut n = self.next_hash.lock().unwrap();
        let hash = TxHash::with_last_byte(*n);
        *n += 1;
        hash
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    fn wallet_address(&self) -> Address {
        self.wallet
    }

    async fn fee_quote(&self) -> Result<FeeQuote, ChainError> {
        self.fee_quotes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(self.default_fee))
    }

    /// Shares the fee quote queue so scripted errors reach the live ticker
    async fn gas_price(&self) -> Result<u128, ChainError> {
        *self.gas_price_reads.lock().unwrap() += 1;
        self.fee_quote().await.map(|fee| fee.base_gas_price)
    }

    async fn native_balance(&self) -> Result<U256, ChainError> {
        Ok(U256::from(10u64).pow(U256::from(18u64)))
    }

    async fn token_balance(&self, token: Address) -> Result<U256, ChainError> {
        Ok(self.balances.lock().unwrap().get(&token).copied().unwrap_or(U256::ZERO))
    }

    async fn allowance(&self, _token: Address, _spender: Address) -> Result<U256, ChainError> {
        Ok(*self.allowance.lock().unwrap())
    }

    async fn is_paused(&self, _wrapper: Address) -> Result<bool, ChainError> {
        Ok(*self.paused.lock().unwrap())
    }

    async fn approve(
        &self,
        _token: Address,
        _spender: Address,
        amount: U256,
        gas_price: u128,
    ) -> Result<TxHash, ChainError> {
        self.calls.lock().unwrap().push(Call::Approve { amount, gas_price });
        if let Some(err) = self.approve_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        *self.allowance.lock().unwrap() = amount;
        Ok(self.next_tx_hash())
    }

    async fn submit_swap(
        &self,
        _wrapper: Address,
        direction: SwapDirection,
        amount: U256,
        gas_price: u128,
        gas_limit: u64,
    ) -> Result<TxHash, ChainError> {
        self.calls.lock().unwrap().push(Call::Swap {
            direction,
            amount,
            gas_price,
            gas_limit,
        });
        if let Some(err) = self.swap_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(self.next_tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>, ChainError> {
        self.calls.lock().unwrap().push(Call::ReceiptPoll(tx_hash));
        if let Some(err) = self.poll_errors.lock().unwrap().pop_front() {
            return Err(err);
        }

        let mut counts = self.poll_counts.lock().unwrap();
        let seen = counts.entry(tx_hash).or_insert(0);
        *seen += 1;
        if *seen <= self.pending_polls {
            return Ok(None);
        }

        Ok(Some(TxReceipt {
            tx_hash,
            block_number: Some(1_000),
            gas_used: self.gas_used,
            success: !*self.reverted.lock().unwrap()
                && !self.reverted_hashes.lock().unwrap().contains(&tx_hash),
        }))
    }
}

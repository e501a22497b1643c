//! Error taxonomy for the swap engine
//!
//! `ChainError` is produced where alloy transport/contract errors cross into
//! the engine, and carries its retry classification from that point on.
//! `SwapError` is the closed set of ways a single swap can fail.
//!
//! Created: 2026-02-03

use crate::contracts::IWrappedToken::IWrappedTokenErrors;
use alloy::primitives::{TxHash, U256};
use alloy::sol_types::SolInterface;
use alloy::transports::{RpcError, TransportError};
use std::time::Duration;
use thiserror::Error;

/// Retry classification attached at the submission boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Network/RPC-layer hiccup; safe to resubmit
    Transient,
    /// Anything else; ends the attempt
    Fatal,
}

/// Node error messages that mean the request itself was rejected
/// (resubmitting the same thing cannot help).
const FATAL_NODE_MESSAGES: [&str; 7] = [
    "execution reverted",
    "insufficient funds",
    "nonce too low",
    "nonce too high",
    "already known",
    "underpriced",
    "exceeds block gas limit",
];

/// Errors raised by the blockchain client collaborator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// Transport-level failure (connection, timeout, empty/garbled response,
    /// or an RPC error the node could not attribute to the request)
    #[error("network error during {context}: {message}")]
    Network { context: String, message: String },

    /// The node or contract rejected the request
    #[error("{context} rejected: {message}")]
    Rejected { context: String, message: String },
}

impl ChainError {
    pub fn network(context: impl Into<String>, message: impl Into<String>) -> Self {
        ChainError::Network {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn rejected(context: impl Into<String>, message: impl Into<String>) -> Self {
        ChainError::Rejected {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Classify an alloy transport error.
    pub fn from_transport(context: &str, err: TransportError) -> Self {
        match &err {
            RpcError::Transport(_) | RpcError::NullResp | RpcError::DeserError { .. } => {
                ChainError::network(context, err.to_string())
            }
            RpcError::ErrorResp(payload) => {
                if let Some(data) = payload.as_revert_data() {
                    let reason = decode_wrapper_revert(&data)
                        .map(|name| format!("{} ({})", payload.message, name))
                        .unwrap_or_else(|| payload.message.to_string());
                    return ChainError::rejected(context, reason);
                }
                let message = payload.message.to_lowercase();
                if FATAL_NODE_MESSAGES.iter().any(|m| message.contains(m)) {
                    ChainError::rejected(context, payload.message.to_string())
                } else {
                    ChainError::network(context, payload.message.to_string())
                }
            }
            _ => ChainError::rejected(context, err.to_string()),
        }
    }

    /// Classify an alloy contract call/send error.
    pub fn from_contract(context: &str, err: alloy::contract::Error) -> Self {
        match err {
            alloy::contract::Error::TransportError(e) => Self::from_transport(context, e),
            other => ChainError::rejected(context, other.to_string()),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ChainError::Network { .. } => ErrorClass::Transient,
            ChainError::Rejected { .. } => ErrorClass::Fatal,
        }
    }
}

/// Name of a wrapper-contract custom error, if the revert data is one
fn decode_wrapper_revert(data: &[u8]) -> Option<&'static str> {
    match IWrappedTokenErrors::abi_decode(data).ok()? {
        IWrappedTokenErrors::InsufficientBalance(_) => Some("InsufficientBalance"),
        IWrappedTokenErrors::ContractPaused(_) => Some("ContractPaused"),
        IWrappedTokenErrors::MinimumAmountNotMet(_) => Some("MinimumAmountNotMet"),
    }
}

/// Ways a single swap attempt can fail
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwapError {
    #[error("configuration missing: {0}")]
    ConfigMissing(String),

    #[error("wrapper contract is paused")]
    ContractPaused,

    #[error("insufficient {symbol} balance: required {required}, available {available}")]
    InsufficientBalance {
        symbol: String,
        required: U256,
        available: U256,
    },

    #[error("allowance update to {required} failed: {reason}")]
    InsufficientAllowance { required: U256, reason: String },

    #[error("timed out after {waited:?} waiting for receipt of {tx_hash}")]
    Timeout { tx_hash: TxHash, waited: Duration },

    #[error("transaction {tx_hash} reverted (gas paid: {gas_fee} wei)")]
    Reverted { tx_hash: TxHash, gas_fee: U256 },

    #[error("scoring API error: {0}")]
    Api(String),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl SwapError {
    /// Only transport-level chain errors are retried.
    pub fn class(&self) -> ErrorClass {
        match self {
            SwapError::Chain(e) => e.class(),
            _ => ErrorClass::Fatal,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.class() == ErrorClass::Transient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::transports::TransportErrorKind;

    fn error_resp(code: i64, message: &str) -> TransportError {
        let payload = serde_json::json!({ "code": code, "message": message });
        RpcError::ErrorResp(serde_json::from_value(payload).unwrap())
    }

    #[test]
    fn test_transport_failure_is_transient() {
        let err = TransportErrorKind::custom_str("connection reset by peer");
        let classified = ChainError::from_transport("send wrap", err);
        assert_eq!(classified.class(), ErrorClass::Transient);
    }

    #[test]
    fn test_null_response_is_transient() {
        let classified = ChainError::from_transport("fee data", RpcError::NullResp);
        assert_eq!(classified.class(), ErrorClass::Transient);
    }

    #[test]
    fn test_unattributed_rpc_error_is_transient() {
        let classified = ChainError::from_transport("send wrap", error_resp(-32000, "header not found"));
        assert_eq!(classified.class(), ErrorClass::Transient);
    }

    #[test]
    fn test_request_rejections_are_fatal() {
        for msg in [
            "execution reverted",
            "insufficient funds for gas * price + value",
            "nonce too low",
            "replacement transaction underpriced",
        ] {
            let classified = ChainError::from_transport("send wrap", error_resp(-32000, msg));
            assert_eq!(classified.class(), ErrorClass::Fatal, "{}", msg);
        }
    }

    #[test]
    fn test_wrapper_revert_is_named() {
        use crate::contracts::IWrappedToken;
        use alloy::sol_types::SolError;

        let data = alloy::primitives::hex::encode_prefixed(IWrappedToken::MinimumAmountNotMet::SELECTOR);
        let payload = serde_json::json!({ "code": 3, "message": "execution reverted", "data": data });
        let err = RpcError::ErrorResp(serde_json::from_value(payload).unwrap());

        match ChainError::from_transport("send wrap", err) {
            ChainError::Rejected { message, .. } => assert!(message.contains("MinimumAmountNotMet"), "{}", message),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_swap_error_classes() {
        assert!(SwapError::Chain(ChainError::network("poll", "reset")).is_transient());
        assert!(!SwapError::Chain(ChainError::rejected("send", "reverted")).is_transient());
        assert!(!SwapError::ContractPaused.is_transient());
        assert!(!SwapError::Api("bad request".into()).is_transient());
        assert!(!SwapError::Timeout {
            tx_hash: TxHash::ZERO,
            waited: Duration::from_secs(600),
        }
        .is_transient());
    }
}

//! Gas Price Strategy
//!
//! Turns fresh fee data plus the user's multiplier into the single gas price
//! used for every transaction of one submission (approvals included).
//! The multiplied price never drops below the network's minimum priority tip.
//!
//! Created: 2026-02-03

use crate::chain::ChainClient;
use crate::error::ChainError;
use crate::types::{FeeQuote, GasOption, GasPlan};
use alloy::primitives::{utils::format_units, U256};
use tracing::warn;

/// Derive the effective gas price for one submission.
pub fn quote(fee: &FeeQuote, option: GasOption) -> GasPlan {
    let computed = option.apply(fee.base_gas_price);
    if computed < fee.min_priority_tip {
        GasPlan {
            option,
            effective_price: fee.min_priority_tip,
            floored_to_min_tip: true,
        }
    } else {
        GasPlan {
            option,
            effective_price: computed,
            floored_to_min_tip: false,
        }
    }
}

/// Fetch fee data and quote it. Fetch errors propagate unchanged.
pub async fn fetch_plan<C: ChainClient + ?Sized>(
    client: &C,
    option: GasOption,
) -> Result<GasPlan, ChainError> {
    let fee = client.fee_quote().await?;
    let plan = quote(&fee, option);
    if plan.floored_to_min_tip {
        warn!(
            "⚠️  Gas price raised to network minimum tip: {} Gwei",
            format_gwei(plan.effective_price)
        );
    }
    Ok(plan)
}

/// Wei -> gwei string
pub fn format_gwei(wei: u128) -> String {
    format_units(U256::from(wei), "gwei").unwrap_or_else(|_| wei.to_string())
}

/// Wei -> ether-unit string (POL on Polygon)
pub fn format_native(wei: U256) -> String {
    format_units(wei, "ether").unwrap_or_else(|_| wei.to_string())
}

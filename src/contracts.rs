//! Contract Definitions
//!
//! Solidity interfaces for the wrap contract and its source token,
//! defined using alloy's `sol!` macro.
//!
//! Each interface is annotated with `#[sol(rpc)]` to generate
//! contract instance types that can make RPC calls via any alloy Provider.
//!
//! Created: 2026-02-03

use alloy::sol;

// ── ERC20 (source token, e.g. WPOL) ──────────────────────────────────

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }
}

// ── Wrapper token (e.g. TPOL) ────────────────────────────────────────

sol! {
    #[sol(rpc)]
    interface IWrappedToken {
        error InsufficientBalance();
        error ContractPaused();
        error MinimumAmountNotMet();

        function balanceOf(address owner) external view returns (uint256);
        function wrap(uint256 amount, address recipient) external;
        function unwrap(uint256 amount, address recipient) external;
        function paused() external view returns (bool);
    }
}

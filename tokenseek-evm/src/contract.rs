//! Solidity interface definitions for on-chain reads.
//!
//! Contains the read-only ERC-20 metadata surface:
//! - [`IERC20Metadata`] - `name`, `symbol`, `totalSupply`, `decimals`

use alloy_sol_types::sol;

sol! {
    /// Read-only ERC-20 metadata interface.
    ///
    /// `name`, `symbol` and `decimals` are optional in EIP-20 itself; tokens
    /// that omit them are treated as non-conforming.
    ///
    /// Reference: <https://eips.ethereum.org/EIPS/eip-20>
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface IERC20Metadata {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function totalSupply() external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

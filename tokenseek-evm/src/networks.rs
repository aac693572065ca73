//! Known EVM networks and their Etherscan-compatible explorer APIs.

/// Ethereum Mainnet chain ID.
pub const ETHEREUM_MAINNET: u64 = 1;

/// Ethereum Sepolia (testnet) chain ID.
pub const ETHEREUM_SEPOLIA: u64 = 11_155_111;

/// Ethereum Holesky (testnet) chain ID.
pub const ETHEREUM_HOLESKY: u64 = 17_000;

/// A known network with the explorer API that indexes its tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvmNetwork {
    /// Human-readable network name (e.g., `"sepolia"`).
    pub name: &'static str,
    /// EIP-155 chain ID.
    pub chain_id: u64,
    /// Base URL of the Etherscan-compatible explorer API.
    pub explorer_api_url: &'static str,
}

/// All networks with a known explorer API.
pub const EVM_NETWORKS: &[EvmNetwork] = &[
    EvmNetwork {
        name: "mainnet",
        chain_id: ETHEREUM_MAINNET,
        explorer_api_url: "https://api.etherscan.io/api",
    },
    EvmNetwork {
        name: "sepolia",
        chain_id: ETHEREUM_SEPOLIA,
        explorer_api_url: "https://api-sepolia.etherscan.io/api",
    },
    EvmNetwork {
        name: "holesky",
        chain_id: ETHEREUM_HOLESKY,
        explorer_api_url: "https://api-holesky.etherscan.io/api",
    },
];

/// Looks up a known network by name (case-insensitive).
#[must_use]
pub fn network_by_name(name: &str) -> Option<&'static EvmNetwork> {
    EVM_NETWORKS
        .iter()
        .find(|n| n.name.eq_ignore_ascii_case(name))
}

/// Returns the names of all known networks.
#[must_use]
pub fn known_network_names() -> Vec<&'static str> {
    EVM_NETWORKS.iter().map(|n| n.name).collect()
}

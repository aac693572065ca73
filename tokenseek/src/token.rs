//! Token records produced by resolution.
//!
//! - [`TokenInfo`] - the four ERC-20 metadata fields read from a contract
//! - [`TokenDescriptor`] - the public, serializable result record
//! - [`TokenSource`] - provenance tag attached to each descriptor

use std::fmt;

use alloy_primitives::{Address, U256, hex};
use serde::Serialize;

use crate::units::format_units;

/// Where a descriptor was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenSource {
    /// Direct lookup of a contract address on the chain.
    #[serde(rename = "blockchain")]
    Blockchain,
    /// Candidate listed by the explorer index, then read from the chain.
    #[serde(rename = "etherscan-blockchain")]
    EtherscanBlockchain,
}

impl TokenSource {
    /// Returns the wire tag for this source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blockchain => "blockchain",
            Self::EtherscanBlockchain => "etherscan-blockchain",
        }
    }
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a contract's metadata was rejected as incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IncompleteMetadata {
    /// `name()` returned an empty string.
    #[error("contract returned an empty name")]
    EmptyName,
    /// `symbol()` returned an empty string.
    #[error("contract returned an empty symbol")]
    EmptySymbol,
    /// `totalSupply()` returned zero.
    #[error("contract reported a zero total supply")]
    ZeroSupply,
}

/// Validated ERC-20 metadata of one contract.
///
/// Only constructible through [`TokenInfo::new`], which rejects the same
/// incomplete values a conforming token never reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    address: Address,
    name: String,
    symbol: String,
    total_supply: U256,
    decimals: u8,
}

impl TokenInfo {
    /// Builds token metadata from the four contract reads.
    ///
    /// # Errors
    ///
    /// Returns [`IncompleteMetadata`] if `name` or `symbol` is empty or
    /// `total_supply` is zero.
    pub fn new(
        address: Address,
        name: String,
        symbol: String,
        total_supply: U256,
        decimals: u8,
    ) -> Result<Self, IncompleteMetadata> {
        if name.is_empty() {
            return Err(IncompleteMetadata::EmptyName);
        }
        if symbol.is_empty() {
            return Err(IncompleteMetadata::EmptySymbol);
        }
        if total_supply.is_zero() {
            return Err(IncompleteMetadata::ZeroSupply);
        }
        Ok(Self {
            address,
            name,
            symbol,
            total_supply,
            decimals,
        })
    }

    /// Contract address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Token name as reported by `name()`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token symbol as reported by `symbol()`.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Raw total supply as reported by `totalSupply()`.
    #[must_use]
    pub const fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Decimal exponent as reported by `decimals()`.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Returns `true` if the lowercased name or symbol contains `needle`.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }

    /// Converts into the public descriptor with the given provenance.
    #[must_use]
    pub fn into_descriptor(self, source: TokenSource) -> TokenDescriptor {
        TokenDescriptor::new(self, source)
    }
}

/// Normalized, serializable result record for one resolved token.
///
/// Serializes with camelCase keys:
///
/// ```json
/// {
///   "address": "0xf574d0c40d3f520360882ee9eabc718cf6aea339",
///   "name": "Token B",
///   "symbol": "TKB",
///   "totalSupply": "1000000000000000000",
///   "decimals": 18,
///   "totalSupplyFormatted": "1.0",
///   "source": "blockchain"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDescriptor {
    address: String,
    name: String,
    symbol: String,
    total_supply: String,
    decimals: u8,
    total_supply_formatted: String,
    source: TokenSource,
}

impl TokenDescriptor {
    /// Builds a descriptor from validated metadata.
    #[must_use]
    pub fn new(info: TokenInfo, source: TokenSource) -> Self {
        Self {
            address: hex::encode_prefixed(info.address),
            total_supply: info.total_supply.to_string(),
            total_supply_formatted: format_units(info.total_supply, info.decimals),
            decimals: info.decimals,
            name: info.name,
            symbol: info.symbol,
            source,
        }
    }

    /// Lowercase `0x`-prefixed contract address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Token name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Raw total supply as a decimal integer string.
    #[must_use]
    pub fn total_supply(&self) -> &str {
        &self.total_supply
    }

    /// Decimal exponent.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Total supply scaled by `10^-decimals`.
    #[must_use]
    pub fn total_supply_formatted(&self) -> &str {
        &self.total_supply_formatted
    }

    /// Provenance tag.
    #[must_use]
    pub const fn source(&self) -> TokenSource {
        self.source
    }
}

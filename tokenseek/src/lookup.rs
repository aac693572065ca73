//! Outcome of reading one contract.

use std::fmt;

use crate::token::TokenInfo;

/// Tagged result of one contract read.
///
/// Every variant other than [`TokenLookup::Found`] means "no descriptor" to
/// the resolver; the tags only exist so callers can log why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLookup {
    /// The contract exposes complete ERC-20 metadata.
    Found(TokenInfo),
    /// No code is deployed at the address.
    NotFound,
    /// Code exists but the metadata calls reverted, failed to decode, or
    /// returned incomplete values.
    NotConforming(String),
    /// The RPC endpoint could not be reached or answered garbage.
    Upstream(String),
}

impl TokenLookup {
    /// Collapses the outcome to the token, if one was found.
    #[must_use]
    pub fn found(self) -> Option<TokenInfo> {
        match self {
            Self::Found(info) => Some(info),
            Self::NotFound | Self::NotConforming(_) | Self::Upstream(_) => None,
        }
    }

    /// Returns `true` for [`TokenLookup::Found`].
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl fmt::Display for TokenLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(info) => write!(f, "found {} ({})", info.name(), info.symbol()),
            Self::NotFound => f.write_str("no contract at address"),
            Self::NotConforming(reason) => write!(f, "not an ERC-20 token: {reason}"),
            Self::Upstream(detail) => write!(f, "upstream error: {detail}"),
        }
    }
}

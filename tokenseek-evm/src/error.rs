//! Error types for EVM token reads.

use alloy_transport::{RpcError, TransportError};
use tokenseek::TokenLookup;
use tokenseek::token::IncompleteMetadata;

/// Errors that can occur while reading token metadata from a contract.
#[derive(Debug, thiserror::Error)]
pub enum Eip155ReadError {
    /// RPC transport error: endpoint unreachable, HTTP failure, bad envelope.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A metadata call reverted or returned undecodable data.
    #[error("Contract call failed: {0}")]
    ContractCall(String),
    /// The calls succeeded but returned values no conforming token reports.
    #[error(transparent)]
    Incomplete(#[from] IncompleteMetadata),
}

impl From<alloy_contract::Error> for Eip155ReadError {
    fn from(e: alloy_contract::Error) -> Self {
        match e {
            alloy_contract::Error::TransportError(RpcError::ErrorResp(payload))
                if payload.as_revert_data().is_some()
                    || payload.message.to_lowercase().contains("revert") =>
            {
                Self::ContractCall(payload.to_string())
            }
            alloy_contract::Error::TransportError(e) => Self::Transport(e),
            other => Self::ContractCall(other.to_string()),
        }
    }
}

impl From<Eip155ReadError> for TokenLookup {
    fn from(value: Eip155ReadError) -> Self {
        match value {
            Eip155ReadError::Transport(e) => Self::Upstream(e.to_string()),
            Eip155ReadError::ContractCall(_) | Eip155ReadError::Incomplete(_) => {
                Self::NotConforming(value.to_string())
            }
        }
    }
}

/// Errors building an RPC client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcEndpointError {
    /// Only `http` and `https` endpoints are supported.
    #[error("unsupported RPC URL scheme `{0}` (expected http or https)")]
    UnsupportedScheme(String),
}

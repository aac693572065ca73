//! Seams between the resolver and its I/O collaborators.
//!
//! - [`TokenReader`] - reads ERC-20 metadata of one address from a chain
//! - [`TokenIndex`] - lists candidate token contracts from an explorer index
//!
//! Both traits return boxed futures so they can be held as trait objects by
//! the resolver and swapped for in-memory fakes in tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::lookup::TokenLookup;

/// A pinned, boxed, `Send` future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Reads token metadata from a chain.
///
/// Implementations are bound to a single RPC endpoint at construction time.
pub trait TokenReader: Send + Sync {
    /// Reads the metadata of the contract at `address`.
    ///
    /// Never fails: every failure is reported as a [`TokenLookup`] variant.
    fn read_token(&self, address: Address) -> BoxFuture<'_, TokenLookup>;
}

impl<T: TokenReader + ?Sized> TokenReader for Arc<T> {
    fn read_token(&self, address: Address) -> BoxFuture<'_, TokenLookup> {
        (**self).read_token(address)
    }
}

impl<T: TokenReader + ?Sized> TokenReader for Box<T> {
    fn read_token(&self, address: Address) -> BoxFuture<'_, TokenLookup> {
        (**self).read_token(address)
    }
}

/// One entry of an explorer token list.
///
/// Only `contractAddress` drives resolution; the name and symbol the index
/// reports are kept for diagnostics and never trusted over the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedToken {
    /// Contract address as listed by the index (not yet validated).
    pub contract_address: String,
    /// Token name as listed by the index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_name: Option<String>,
    /// Token symbol as listed by the index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl IndexedToken {
    /// Creates an entry with only a contract address.
    #[must_use]
    pub fn new(contract_address: impl Into<String>) -> Self {
        Self {
            contract_address: contract_address.into(),
            token_name: None,
            symbol: None,
        }
    }
}

/// Errors returned by a [`TokenIndex`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// The request could not be sent or the response could not be read.
    #[error("index request failed: {0}")]
    Transport(String),
    /// The index answered with a non-success HTTP status.
    #[error("index returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },
    /// The response body was not the expected JSON shape.
    #[error("index response malformed: {0}")]
    Malformed(String),
}

/// Lists candidate token contracts for one network.
pub trait TokenIndex: Send + Sync {
    /// Fetches the full list of tracked token contracts.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] on transport failure or an unexpected response.
    fn token_list(&self) -> BoxFuture<'_, Result<Vec<IndexedToken>, IndexError>>;
}

impl<T: TokenIndex + ?Sized> TokenIndex for Arc<T> {
    fn token_list(&self) -> BoxFuture<'_, Result<Vec<IndexedToken>, IndexError>> {
        (**self).token_list()
    }
}

impl<T: TokenIndex + ?Sized> TokenIndex for Box<T> {
    fn token_list(&self) -> BoxFuture<'_, Result<Vec<IndexedToken>, IndexError>> {
        (**self).token_list()
    }
}

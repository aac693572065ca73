#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! EIP-155 (EVM) token metadata reader for tokenseek.
//!
//! Implements [`tokenseek::TokenReader`] on top of an alloy provider: a
//! bytecode presence check followed by concurrent `name()`, `symbol()`,
//! `totalSupply()` and `decimals()` calls.
//!
//! # Modules
//!
//! - [`contract`] - `sol!` bindings for the ERC-20 metadata interface
//! - [`reader`] - [`Eip155TokenReader`]
//! - [`provider`] - HTTP RPC client construction with optional throttling
//! - [`networks`] - Known networks and their explorer APIs
//!
//! # Feature Flags
//!
//! - `telemetry` - `tracing` spans around RPC calls and lookup outcome events

pub mod contract;
pub mod error;
pub mod networks;
pub mod provider;
pub mod reader;

pub use error::{Eip155ReadError, RpcEndpointError};
pub use networks::{EVM_NETWORKS, EvmNetwork, network_by_name};
pub use provider::{http_provider, rpc_client};
pub use reader::Eip155TokenReader;

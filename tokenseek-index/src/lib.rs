#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Token index client for tokenseek.
//!
//! [`EtherscanTokenIndex`] implements [`tokenseek::TokenIndex`] against an
//! Etherscan-compatible explorer API (`module=token&action=tokenlist`).
//!
//! # Feature Flags
//!
//! - `telemetry` - `tracing` events for fetched list sizes

pub mod etherscan;

pub use etherscan::{DEFAULT_INDEX_TIMEOUT, EtherscanTokenIndex, IndexConfig};

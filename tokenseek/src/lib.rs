#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Token resolution engine.
//!
//! Turns a user query (a contract address or a name fragment) into a list of
//! ERC-20 token descriptors. Chain access and index access sit behind the
//! [`TokenReader`] and [`TokenIndex`] traits; chain-specific and HTTP-specific
//! implementations live in the `tokenseek-evm` and `tokenseek-index` crates.
//!
//! # Modules
//!
//! - [`query`] - Syntactic address/name classification
//! - [`token`] - Token metadata and the public descriptor record
//! - [`lookup`] - Tagged outcome of a single contract read
//! - [`source`] - Reader and index traits
//! - [`resolver`] - The resolution pipeline
//! - [`units`] - Exact decimal rendering of raw amounts
//!
//! # Feature Flags
//!
//! - `telemetry` - Emits `tracing` events from the resolver

pub mod lookup;
pub mod query;
pub mod resolver;
pub mod source;
pub mod token;
pub mod units;

pub use lookup::TokenLookup;
pub use query::Query;
pub use resolver::{Resolution, Resolver};
pub use source::{IndexError, IndexedToken, TokenIndex, TokenReader};
pub use token::{TokenDescriptor, TokenInfo, TokenSource};

//! Query resolution pipeline.
//!
//! [`Resolver`] classifies a query and drives the collaborators:
//!
//! - address query: one [`TokenReader`] call, tagged [`TokenSource::Blockchain`]
//! - name query: one [`TokenIndex`] call, then a bounded, order-preserving
//!   fan-out of [`TokenReader`] calls, filtered by name/symbol substring and
//!   tagged [`TokenSource::EtherscanBlockchain`]
//!
//! The resolver holds no state between calls. Failures never escape
//! [`Resolver::resolve`]; [`Resolver::resolve_detailed`] reports them as
//! diagnostics next to the result.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use alloy_primitives::{Address, hex};
use futures_util::StreamExt;
use futures_util::stream;

use crate::lookup::TokenLookup;
use crate::query::{Query, parse_address};
use crate::source::{IndexError, IndexedToken, TokenIndex, TokenReader};
use crate::token::{TokenDescriptor, TokenSource};

/// Default cap on concurrent contract reads during a name search.
pub const DEFAULT_MAX_CONCURRENCY: NonZeroUsize = NonZeroUsize::new(8).expect("non-zero");

/// Why a candidate produced no descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The index listed a string that is not a `0x`-prefixed address.
    InvalidAddress,
    /// The contract read did not yield token metadata.
    Lookup(TokenLookup),
    /// The token was read but neither name nor symbol matched the query.
    NoMatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAddress => f.write_str("invalid contract address"),
            Self::Lookup(lookup) => write!(f, "{lookup}"),
            Self::NoMatch => f.write_str("name and symbol do not match"),
        }
    }
}

/// A candidate that was dropped from the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCandidate {
    /// Address as given by the query or the index.
    pub contract_address: String,
    /// Why it was dropped.
    pub reason: SkipReason,
}

/// Detailed outcome of one resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Matching descriptors, in index order.
    pub tokens: Vec<TokenDescriptor>,
    /// Candidates that produced no descriptor.
    pub skipped: Vec<SkippedCandidate>,
    /// Set when the index could not be queried; `tokens` is then empty.
    pub index_error: Option<IndexError>,
}

/// Resolves queries into token descriptors.
///
/// # Example
///
/// ```ignore
/// use tokenseek::Resolver;
///
/// let resolver = Resolver::new(reader, index);
/// let tokens = resolver.resolve("Token B").await;
/// ```
#[derive(Clone)]
pub struct Resolver {
    reader: Arc<dyn TokenReader>,
    index: Arc<dyn TokenIndex>,
    max_concurrency: NonZeroUsize,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Creates a resolver over the given reader and index.
    #[must_use]
    pub fn new(reader: impl TokenReader + 'static, index: impl TokenIndex + 'static) -> Self {
        Self {
            reader: Arc::new(reader),
            index: Arc::new(index),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Sets the cap on concurrent contract reads during a name search.
    #[must_use]
    pub const fn with_max_concurrency(mut self, max_concurrency: NonZeroUsize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Returns the cap on concurrent contract reads.
    #[must_use]
    pub const fn max_concurrency(&self) -> NonZeroUsize {
        self.max_concurrency
    }

    /// Resolves `query` into descriptors.
    ///
    /// An empty vector is a valid outcome; it does not distinguish "no such
    /// token" from infrastructure failures.
    pub async fn resolve(&self, query: &str) -> Vec<TokenDescriptor> {
        self.resolve_detailed(query).await.tokens
    }

    /// Resolves `query` and keeps the per-candidate diagnostics.
    pub async fn resolve_detailed(&self, query: &str) -> Resolution {
        self.resolve_query(&Query::parse(query)).await
    }

    /// Resolves an already classified query.
    pub async fn resolve_query(&self, query: &Query) -> Resolution {
        #[cfg(feature = "telemetry")]
        tracing::debug!(kind = query.kind(), query = %query, "Resolving token query");
        match query {
            Query::Address(address) => self.resolve_address(*address).await,
            Query::Name(name) => self.resolve_name(name).await,
        }
    }

    async fn resolve_address(&self, address: Address) -> Resolution {
        match self.reader.read_token(address).await {
            TokenLookup::Found(info) => Resolution {
                tokens: vec![info.into_descriptor(TokenSource::Blockchain)],
                ..Resolution::default()
            },
            other => {
                #[cfg(feature = "telemetry")]
                tracing::debug!(%address, outcome = %other, "Address lookup yielded no token");
                Resolution {
                    skipped: vec![SkippedCandidate {
                        contract_address: hex::encode_prefixed(address),
                        reason: SkipReason::Lookup(other),
                    }],
                    ..Resolution::default()
                }
            }
        }
    }

    async fn resolve_name(&self, name: &str) -> Resolution {
        let candidates = match self.index.token_list().await {
            Ok(candidates) => candidates,
            Err(error) => {
                #[cfg(feature = "telemetry")]
                tracing::warn!(%error, "Token index unavailable, returning no candidates");
                return Resolution {
                    index_error: Some(error),
                    ..Resolution::default()
                };
            }
        };
        #[cfg(feature = "telemetry")]
        tracing::debug!(candidates = candidates.len(), "Fetched index candidates");

        let reads = self.read_candidates(candidates).await;

        let needle = name.to_lowercase();
        let mut resolution = Resolution::default();
        for (candidate, lookup) in reads {
            let reason = match lookup {
                Some(TokenLookup::Found(info)) if info.matches_lowercase(&needle) => {
                    resolution
                        .tokens
                        .push(info.into_descriptor(TokenSource::EtherscanBlockchain));
                    continue;
                }
                Some(TokenLookup::Found(_)) => SkipReason::NoMatch,
                Some(other) => SkipReason::Lookup(other),
                None => SkipReason::InvalidAddress,
            };
            #[cfg(feature = "telemetry")]
            tracing::debug!(candidate = %candidate.contract_address, %reason, "Skipping candidate");
            resolution.skipped.push(SkippedCandidate {
                contract_address: candidate.contract_address,
                reason,
            });
        }
        resolution
    }

    /// Reads every candidate with at most `max_concurrency` reads in flight.
    ///
    /// Output order follows `candidates`, not completion order.
    async fn read_candidates(
        &self,
        candidates: Vec<IndexedToken>,
    ) -> Vec<(IndexedToken, Option<TokenLookup>)> {
        let reader = Arc::clone(&self.reader);
        stream::iter(candidates)
            .map(move |candidate| {
                let reader = Arc::clone(&reader);
                async move {
                    let lookup = match parse_address(&candidate.contract_address) {
                        Some(address) => Some(reader.read_token(address).await),
                        None => None,
                    };
                    (candidate, lookup)
                }
            })
            .buffered(self.max_concurrency.get())
            .collect()
            .await
    }
}

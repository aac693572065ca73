//! Etherscan-compatible token list client.
//!
//! Provides [`EtherscanTokenIndex`], which implements [`TokenIndex`] by
//! calling `module=token&action=tokenlist` on an explorer API. The index is
//! asked for its full tracked set; filtering by name happens client-side in
//! the resolver.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};
use serde::Deserialize;
use tokenseek::source::BoxFuture;
use tokenseek::{IndexError, IndexedToken, TokenIndex};
use url::Url;

/// Default request timeout for index calls.
pub const DEFAULT_INDEX_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`EtherscanTokenIndex`].
pub struct IndexConfig {
    /// Explorer API base URL (e.g. `https://api-sepolia.etherscan.io/api`).
    pub url: Url,

    /// Explorer API key.
    pub api_key: String,

    /// Chain ID sent as `chainid`, for multichain explorer APIs.
    pub chain_id: Option<u64>,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Optional pre-configured reqwest client. If `None`, a new client is
    /// created with the configured timeout.
    pub http_client: Option<reqwest::Client>,
}

impl IndexConfig {
    /// Creates a config for the given API URL and key.
    #[must_use]
    pub fn new(url: Url, api_key: impl Into<String>) -> Self {
        Self {
            url,
            api_key: api_key.into(),
            chain_id: None,
            timeout: DEFAULT_INDEX_TIMEOUT,
            http_client: None,
        }
    }

    /// Sets the `chainid` query parameter.
    #[must_use]
    pub const fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl std::fmt::Debug for IndexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexConfig")
            .field("url", &self.url.as_str())
            .field("has_api_key", &!self.api_key.is_empty())
            .field("chain_id", &self.chain_id)
            .field("timeout", &self.timeout)
            .field("has_http_client", &self.http_client.is_some())
            .finish()
    }
}

/// Envelope of an Etherscan API response.
///
/// On failure Etherscan still answers 200 with `status = "0"` and an error
/// string in `result`.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: serde_json::Value,
}

/// Async client for an Etherscan-compatible token list endpoint.
///
/// # Example
///
/// ```no_run
/// use tokenseek_index::{EtherscanTokenIndex, IndexConfig};
///
/// let url = "https://api-sepolia.etherscan.io/api".parse().unwrap();
/// let index = EtherscanTokenIndex::new(IndexConfig::new(url, "MY_API_KEY"));
/// ```
pub struct EtherscanTokenIndex {
    request_url: Url,
    client: reqwest::Client,
}

impl EtherscanTokenIndex {
    /// Creates a new index client from the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if no client is supplied and the default reqwest client cannot
    /// be built (TLS backend initialization failure).
    #[must_use]
    pub fn new(config: IndexConfig) -> Self {
        let mut request_url = config.url;
        {
            let mut query = request_url.query_pairs_mut();
            query
                .append_pair("module", "token")
                .append_pair("action", "tokenlist");
            if let Some(chain_id) = config.chain_id {
                query.append_pair("chainid", &chain_id.to_string());
            }
            query.append_pair("apikey", &config.api_key);
        }

        let client = config.http_client.unwrap_or_else(|| {
            reqwest::Client::builder()
                .timeout(config.timeout)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()
                .expect("failed to build reqwest::Client")
        });

        Self {
            request_url,
            client,
        }
    }

    /// Fetches the full token list.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] on network failure, non-2xx status, or a body
    /// that does not carry a `result` array.
    pub async fn fetch_token_list(&self) -> Result<Vec<IndexedToken>, IndexError> {
        let response = self
            .client
            .get(self.request_url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| IndexError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| IndexError::Transport(e.without_url().to_string()))?;
        let tokens = parse_token_list(&body)?;

        #[cfg(feature = "telemetry")]
        tracing::info!(tokens = tokens.len(), "Fetched token list from index");

        Ok(tokens)
    }
}

/// Parses an Etherscan `tokenlist` response body.
///
/// Only a `result` that is not an array fails the whole list. Entries are
/// decoded one by one; see [`decode_entry`].
fn parse_token_list(body: &str) -> Result<Vec<IndexedToken>, IndexError> {
    let envelope: ApiResponse =
        serde_json::from_str(body).map_err(|e| IndexError::Malformed(e.to_string()))?;
    match envelope.result {
        serde_json::Value::Array(entries) => {
            Ok(entries.into_iter().filter_map(decode_entry).collect())
        }
        other => {
            let message = envelope.message.unwrap_or_else(|| "unexpected result".to_owned());
            Err(IndexError::Malformed(format!("{message}: {other}")))
        }
    }
}

/// Decodes one list entry.
///
/// An entry whose incidental fields are mistyped keeps its `contractAddress`;
/// an entry without a string `contractAddress` is dropped.
fn decode_entry(entry: serde_json::Value) -> Option<IndexedToken> {
    let address = entry
        .get("contractAddress")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned);
    match IndexedToken::deserialize(entry) {
        Ok(token) => Some(token),
        Err(error) => {
            #[cfg(feature = "telemetry")]
            tracing::debug!(%error, contract_address = ?address, "Malformed index entry");
            #[cfg(not(feature = "telemetry"))]
            drop(error);
            address.map(IndexedToken::new)
        }
    }
}

impl std::fmt::Debug for EtherscanTokenIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut endpoint = self.request_url.clone();
        endpoint.set_query(None);
        f.debug_struct("EtherscanTokenIndex")
            .field("endpoint", &endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl TokenIndex for EtherscanTokenIndex {
    fn token_list(&self) -> BoxFuture<'_, Result<Vec<IndexedToken>, IndexError>> {
        Box::pin(self.fetch_token_list())
    }
}

//! Server configuration.
//!
//! Loads configuration from a TOML file with support for environment variable
//! expansion in string values. Variables use `$VAR` or `${VAR}` syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 3000
//! network = "sepolia"
//! max_concurrency = 8
//!
//! [rpc]
//! url = "$RPC_URL"
//! rate_limit = 25
//!
//! [index]
//! api_key = "$ETHERSCAN_API_KEY"
//! timeout_secs = 30
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to configuration file (default: `config.toml`)
//! - `HOST` - Override server bind address
//! - `PORT` - Override server port
//! - Secrets referenced by `$VAR` in the config file

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tokenseek_evm::{EvmNetwork, network_by_name};
use url::Url;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`ServerConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `network` names no known network.
    #[error("unknown network `{name}` (known: {known})")]
    UnknownNetwork {
        /// Configured name.
        name: String,
        /// Comma-separated known names.
        known: String,
    },

    /// A required value is absent or empty.
    #[error("`{0}` is not set")]
    Missing(&'static str),

    /// A required value still holds an unexpanded `$VAR` reference.
    #[error("`{field}` references an unset environment variable: {value}")]
    Unresolved {
        /// Config key.
        field: &'static str,
        /// Raw value.
        value: String,
    },

    /// A URL value does not parse.
    #[error("`{field}` is not a valid URL: {source}")]
    InvalidUrl {
        /// Config key.
        field: &'static str,
        /// Parse error.
        source: url::ParseError,
    },

    /// `max_concurrency` is zero.
    #[error("`max_concurrency` must be at least 1")]
    ZeroConcurrency,
}

/// Top-level configuration, as written in the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (default: `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Server port (default: `3000`).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Known network name (default: `sepolia`).
    #[serde(default = "default_network")]
    pub network: String,

    /// Cap on concurrent contract reads per name search (default: `8`).
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Chain RPC settings.
    #[serde(default)]
    pub rpc: RpcSection,

    /// Token index settings.
    #[serde(default)]
    pub index: IndexSection,
}

/// `[rpc]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcSection {
    /// HTTP(S) JSON-RPC endpoint. Required.
    #[serde(default)]
    pub url: String,

    /// Requests per second; unthrottled when absent.
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

/// `[index]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexSection {
    /// Explorer API URL; defaults to the network's explorer.
    #[serde(default)]
    pub url: Option<String>,

    /// Explorer API key. Required.
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds (default: `30`).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            url: None,
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

const fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

const fn default_port() -> u16 {
    3000
}

fn default_network() -> String {
    "sepolia".to_owned()
}

const fn default_max_concurrency() -> usize {
    8
}

const fn default_timeout_secs() -> u64 {
    30
}

/// Validated settings the service is built from.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address to bind the HTTP listener to.
    pub bind: SocketAddr,
    /// Selected network.
    pub network: &'static EvmNetwork,
    /// Chain RPC endpoint.
    pub rpc_url: Url,
    /// RPC requests per second.
    pub rpc_rate_limit: Option<u32>,
    /// Explorer API endpoint.
    pub index_url: Url,
    /// Explorer API key.
    pub index_api_key: String,
    /// Explorer request timeout.
    pub index_timeout: Duration,
    /// Cap on concurrent contract reads.
    pub max_concurrency: NonZeroUsize,
}

impl ServerConfig {
    /// Loads configuration from `path`, or all defaults when it does not exist.
    ///
    /// After loading, all `$VAR` / `${VAR}` references are expanded from the
    /// process environment. `HOST` and `PORT` env vars override the file
    /// values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = if path.exists() {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            String::new()
        };

        let mut config = Self::parse(&content)?;

        if let Ok(host) = std::env::var("HOST")
            && let Ok(addr) = host.parse()
        {
            config.host = addr;
        }
        if let Ok(port) = std::env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }

        Ok(config)
    }

    /// Parses TOML content after expanding environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on invalid TOML.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let expanded = expand_vars(content, |name| std::env::var(name).ok());
        Ok(toml::from_str(&expanded)?)
    }

    /// Checks required values and resolves defaults.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<Settings, ConfigError> {
        let network =
            network_by_name(&self.network).ok_or_else(|| ConfigError::UnknownNetwork {
                name: self.network.clone(),
                known: tokenseek_evm::networks::known_network_names().join(", "),
            })?;

        let max_concurrency =
            NonZeroUsize::new(self.max_concurrency).ok_or(ConfigError::ZeroConcurrency)?;

        let rpc_url = required("rpc.url", &self.rpc.url)?;
        let rpc_url = parse_url("rpc.url", rpc_url)?;

        let index_api_key = required("index.api_key", &self.index.api_key)?.to_owned();
        let index_url = match self.index.url.as_deref() {
            Some(raw) => parse_url("index.url", required("index.url", raw)?)?,
            None => parse_url("index.url", network.explorer_api_url)?,
        };

        Ok(Settings {
            bind: SocketAddr::new(self.host, self.port),
            network,
            rpc_url,
            rpc_rate_limit: self.rpc.rate_limit,
            index_url,
            index_api_key,
            index_timeout: Duration::from_secs(self.index.timeout_secs),
            max_concurrency,
        })
    }
}

/// Rejects empty values and unexpanded `$VAR` references.
fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Missing(field));
    }
    if value.starts_with('$') {
        return Err(ConfigError::Unresolved {
            field,
            value: value.to_owned(),
        });
    }
    Ok(value)
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse()
        .map_err(|source| ConfigError::InvalidUrl { field, source })
}

/// Expands `$VAR` and `${VAR}` patterns using `lookup`.
///
/// Unresolved variables are left as-is.
fn expand_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        while let Some(&c) = chars.peek() {
            if braced {
                if c == '}' {
                    chars.next();
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        if var_name.is_empty() {
            result.push('$');
            if braced {
                result.push('{');
            }
        } else if let Some(val) = lookup(&var_name) {
            result.push_str(&val);
        } else {
            result.push('$');
            if braced {
                result.push('{');
            }
            result.push_str(&var_name);
            if braced {
                result.push('}');
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(name: &str) -> Option<String> {
        match name {
            "RPC_URL" => Some("https://rpc.sepolia.example".to_owned()),
            "KEY" => Some("abc123".to_owned()),
            _ => None,
        }
    }

    const FULL: &str = r#"
        host = "127.0.0.1"
        port = 8080
        network = "mainnet"
        max_concurrency = 4

        [rpc]
        url = "https://rpc.example"
        rate_limit = 25

        [index]
        url = "https://index.example/api"
        api_key = "K"
        timeout_secs = 5
    "#;

    #[test]
    fn test_expand_vars() {
        assert_eq!(
            expand_vars("url = \"$RPC_URL\"", vars),
            "url = \"https://rpc.sepolia.example\""
        );
        assert_eq!(expand_vars("key = \"${KEY}\"", vars), "key = \"abc123\"");
        assert_eq!(expand_vars("a = \"$MISSING\"", vars), "a = \"$MISSING\"");
        assert_eq!(expand_vars("b = \"${MISSING}\"", vars), "b = \"${MISSING}\"");
        assert_eq!(expand_vars("price = \"$ 5\"", vars), "price = \"$ 5\"");
    }

    #[test]
    fn test_full_config_validates() {
        let settings = ServerConfig::parse(FULL).unwrap().validate().unwrap();

        assert_eq!(settings.bind, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(settings.network.chain_id, 1);
        assert_eq!(settings.rpc_url.as_str(), "https://rpc.example/");
        assert_eq!(settings.rpc_rate_limit, Some(25));
        assert_eq!(settings.index_url.as_str(), "https://index.example/api");
        assert_eq!(settings.index_api_key, "K");
        assert_eq!(settings.index_timeout, Duration::from_secs(5));
        assert_eq!(settings.max_concurrency.get(), 4);
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::parse(
            "[rpc]\nurl = \"http://localhost:8545\"\n[index]\napi_key = \"K\"\n",
        )
        .unwrap();
        let settings = config.validate().unwrap();

        assert_eq!(settings.bind.port(), 3000);
        assert_eq!(settings.network.name, "sepolia");
        assert_eq!(
            settings.index_url.as_str(),
            "https://api-sepolia.etherscan.io/api"
        );
        assert_eq!(settings.rpc_rate_limit, None);
        assert_eq!(settings.index_timeout, Duration::from_secs(30));
        assert_eq!(settings.max_concurrency.get(), 8);
    }

    #[test]
    fn test_missing_secrets_fail() {
        let empty = ServerConfig::parse("").unwrap();
        assert!(matches!(
            empty.validate(),
            Err(ConfigError::Missing("rpc.url"))
        ));

        let no_key = ServerConfig::parse("[rpc]\nurl = \"http://localhost:8545\"\n").unwrap();
        assert!(matches!(
            no_key.validate(),
            Err(ConfigError::Missing("index.api_key"))
        ));
    }

    #[test]
    fn test_unresolved_variable_fails() {
        let config = ServerConfig::parse(
            "[rpc]\nurl = \"$TOKENSEEK_TEST_SURELY_UNSET_RPC\"\n[index]\napi_key = \"K\"\n",
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Unresolved { field: "rpc.url", .. })
        ));
    }

    #[test]
    fn test_invalid_values_fail() {
        let mut config = ServerConfig::parse(FULL).unwrap();
        config.network = "atlantis".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sepolia"), "{err}");

        let mut config = ServerConfig::parse(FULL).unwrap();
        config.max_concurrency = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroConcurrency)));

        let mut config = ServerConfig::parse(FULL).unwrap();
        config.rpc.url = "not a url".to_owned();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { field: "rpc.url", .. })
        ));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        assert!(matches!(
            ServerConfig::parse("port = \"eighty\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load_from(Path::new("/nonexistent/tokenseek.toml")).unwrap();
        assert_eq!(config.network, "sepolia");
        assert!(config.rpc.url.is_empty());
    }
}

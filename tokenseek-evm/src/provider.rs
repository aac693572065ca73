//! RPC client construction.

use alloy_provider::RootProvider;
use alloy_rpc_client::RpcClient;
use alloy_transport::layers::ThrottleLayer;
use alloy_transport_http::Http;
use tower::ServiceBuilder;
use url::Url;

use crate::error::RpcEndpointError;

/// Creates an RPC client for an HTTP(S) endpoint.
///
/// With `rate_limit` set, requests are throttled to that many per second.
///
/// # Errors
///
/// Returns [`RpcEndpointError::UnsupportedScheme`] for non-HTTP(S) URLs.
pub fn rpc_client(url: &Url, rate_limit: Option<u32>) -> Result<RpcClient, RpcEndpointError> {
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(RpcEndpointError::UnsupportedScheme(scheme.to_owned()));
    }

    #[cfg(feature = "telemetry")]
    tracing::info!(rpc_url = %url, rate_limit = ?rate_limit, "Using HTTP transport");

    let client = match rate_limit {
        Some(limit) => {
            let service = ServiceBuilder::new()
                .layer(ThrottleLayer::new(limit))
                .service(Http::new(url.clone()));
            RpcClient::new(service, false)
        }
        None => RpcClient::new(Http::new(url.clone()), false),
    };
    Ok(client)
}

/// Creates a read-only provider for an HTTP(S) endpoint.
///
/// No fillers or signers are attached; the token reader only issues
/// `eth_getCode`, `eth_call` and `eth_chainId`.
///
/// # Errors
///
/// Returns [`RpcEndpointError::UnsupportedScheme`] for non-HTTP(S) URLs.
pub fn http_provider(url: &Url, rate_limit: Option<u32>) -> Result<RootProvider, RpcEndpointError> {
    rpc_client(url, rate_limit).map(RootProvider::new)
}

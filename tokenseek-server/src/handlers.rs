//! Axum route handlers for the search service.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use tokenseek::resolver::Resolution;
use tokenseek::{Resolver, TokenDescriptor};

use crate::error::SearchError;

/// Shared application state for the search service.
pub type SearchState = Arc<Resolver>;

/// Query string of `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Contract address or name fragment.
    pub query: Option<String>,
}

/// `GET /search?query=<q>` - Resolves a token by address or name.
///
/// # Errors
///
/// Returns 400 if `query` is missing or blank.
pub async fn get_search(
    State(resolver): State<SearchState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<TokenDescriptor>>, SearchError> {
    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or(SearchError::MissingQuery)?;

    let resolution = resolver.resolve_detailed(&query).await;
    log_resolution(&query, &resolution);
    Ok(Json(resolution.tokens))
}

fn log_resolution(query: &str, resolution: &Resolution) {
    if let Some(err) = &resolution.index_error {
        tracing::warn!(query, error = %err, "Token index unavailable, returning no results");
    }
    for skipped in &resolution.skipped {
        tracing::debug!(
            query,
            candidate = %skipped.contract_address,
            reason = %skipped.reason,
            "Skipped candidate"
        );
    }
    tracing::info!(
        query,
        found = resolution.tokens.len(),
        skipped = resolution.skipped.len(),
        "Search handled"
    );
}

/// `GET /health` - Liveness probe.
pub async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Creates an Axum [`axum::Router`] with all service endpoints.
///
/// Endpoints:
/// - `GET /search` - resolve a token query
/// - `GET /health` - liveness probe
pub fn search_router(state: SearchState) -> axum::Router {
    axum::Router::new()
        .route("/search", axum::routing::get(get_search))
        .route("/health", axum::routing::get(get_health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use alloy_primitives::{Address, U256, address};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tokenseek::source::BoxFuture;
    use tokenseek::{IndexError, IndexedToken, TokenIndex, TokenInfo, TokenLookup, TokenReader};
    use tower::ServiceExt;

    use super::*;

    const TOKEN_B: Address = address!("f574d0c40d3f520360882ee9eabc718cf6aea339");

    struct MapReader(HashMap<Address, TokenInfo>);

    impl TokenReader for MapReader {
        fn read_token(&self, address: Address) -> BoxFuture<'_, TokenLookup> {
            let lookup = self
                .0
                .get(&address)
                .cloned()
                .map_or(TokenLookup::NotFound, TokenLookup::Found);
            Box::pin(async move { lookup })
        }
    }

    struct StaticIndex(Result<Vec<IndexedToken>, IndexError>);

    impl TokenIndex for StaticIndex {
        fn token_list(&self) -> BoxFuture<'_, Result<Vec<IndexedToken>, IndexError>> {
            let list = self.0.clone();
            Box::pin(async move { list })
        }
    }

    fn router(index: Result<Vec<IndexedToken>, IndexError>) -> axum::Router {
        let info = TokenInfo::new(
            TOKEN_B,
            "Token B".to_owned(),
            "TKB".to_owned(),
            U256::from(10_u64).pow(U256::from(18_u64)),
            18,
        )
        .unwrap();
        let reader = MapReader(HashMap::from([(TOKEN_B, info)]));
        search_router(Arc::new(Resolver::new(reader, StaticIndex(index))))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn listing() -> Result<Vec<IndexedToken>, IndexError> {
        Ok(vec![
            IndexedToken::new("0x1111111111111111111111111111111111111111"),
            IndexedToken::new("0xf574d0c40d3f520360882ee9eabc718cf6aea339"),
        ])
    }

    #[tokio::test]
    async fn test_search_by_address() {
        let (status, body) = get(
            router(listing()),
            "/search?query=0xF574D0c40D3f520360882ee9Eabc718cF6AEA339",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!([{
                "address": "0xf574d0c40d3f520360882ee9eabc718cf6aea339",
                "name": "Token B",
                "symbol": "TKB",
                "totalSupply": "1000000000000000000",
                "decimals": 18,
                "totalSupplyFormatted": "1.0",
                "source": "blockchain"
            }])
        );
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let (status, body) = get(router(listing()), "/search?query=token%20b").await;

        assert_eq!(status, StatusCode::OK);
        let tokens = body.as_array().unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0]["source"], "etherscan-blockchain");
        assert_eq!(tokens[0]["symbol"], "TKB");
    }

    #[tokio::test]
    async fn test_no_match_is_empty_array() {
        let (status, body) = get(router(listing()), "/search?query=nothing").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_index_failure_is_empty_array() {
        let failing = Err(IndexError::Status {
            status: 503,
            body: String::new(),
        });
        let (status, body) = get(router(failing), "/search?query=Token").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_missing_or_blank_query_is_bad_request() {
        for uri in ["/search", "/search?query=", "/search?query=%20%20"] {
            let (status, body) = get(router(listing()), uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"], "missing query parameter");
        }
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(router(listing()), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}

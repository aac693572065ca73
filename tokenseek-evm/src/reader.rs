//! ERC-20 metadata reader.
//!
//! [`Eip155TokenReader`] answers "is there a conforming token at this
//! address?" with one `eth_getCode` followed by four concurrent `eth_call`s.
//! Every failure is folded into a [`TokenLookup`] variant; nothing is retried.

use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_transport::TransportError;
use tokenseek::source::BoxFuture;
use tokenseek::{TokenInfo, TokenLookup, TokenReader};

use crate::contract::IERC20Metadata;
use crate::error::Eip155ReadError;

/// Awaits a future, optionally instrumenting it with a tracing span.
macro_rules! traced {
    ($fut:expr, $span:expr) => {{
        #[cfg(feature = "telemetry")]
        {
            use tracing::Instrument;
            $fut.instrument($span).await
        }
        #[cfg(not(feature = "telemetry"))]
        {
            $fut.await
        }
    }};
}

/// Reads ERC-20 metadata through an alloy [`Provider`].
#[derive(Debug, Clone)]
pub struct Eip155TokenReader<P> {
    provider: P,
}

impl<P: Provider> Eip155TokenReader<P> {
    /// Creates a reader over `provider`.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns the underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Queries the chain ID of the connected node.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the node cannot be reached.
    pub async fn chain_id(&self) -> Result<u64, TransportError> {
        self.provider.get_chain_id().await
    }

    /// Reads the token at `address`, reporting why when there is none.
    pub async fn lookup(&self, address: Address) -> TokenLookup {
        let outcome = self.try_read(address).await;
        #[cfg(feature = "telemetry")]
        log_outcome(address, &outcome);
        match outcome {
            Ok(Some(info)) => TokenLookup::Found(info),
            Ok(None) => TokenLookup::NotFound,
            Err(e) => e.into(),
        }
    }

    /// Reads the token at `address`, or `None` for any kind of failure.
    pub async fn fetch_token(&self, address: Address) -> Option<TokenInfo> {
        self.lookup(address).await.found()
    }

    async fn try_read(&self, address: Address) -> Result<Option<TokenInfo>, Eip155ReadError> {
        if !is_contract_deployed(&self.provider, &address).await? {
            return Ok(None);
        }

        let contract = IERC20Metadata::new(address, &self.provider);
        let name_b = contract.name();
        let symbol_b = contract.symbol();
        let total_supply_b = contract.totalSupply();
        let decimals_b = contract.decimals();

        let reads = async {
            tokio::try_join!(
                name_b.call().into_future(),
                symbol_b.call().into_future(),
                total_supply_b.call().into_future(),
                decimals_b.call().into_future(),
            )
        };
        let (name, symbol, total_supply, decimals) = traced!(
            reads,
            tracing::info_span!("read_erc20_metadata", token = %address, otel.kind = "client")
        )?;

        Ok(Some(TokenInfo::new(
            address,
            name,
            symbol,
            total_supply,
            decimals,
        )?))
    }
}

#[cfg(feature = "telemetry")]
fn log_outcome(address: Address, outcome: &Result<Option<TokenInfo>, Eip155ReadError>) {
    match outcome {
        Ok(Some(info)) => {
            tracing::debug!(%address, name = info.name(), symbol = info.symbol(), "Read token metadata");
        }
        Ok(None) => tracing::debug!(%address, "No contract at address"),
        Err(Eip155ReadError::Transport(e)) => {
            tracing::warn!(%address, error = %e, "RPC failure while reading token");
        }
        Err(e) => tracing::debug!(%address, error = %e, "Contract is not a conforming token"),
    }
}

/// Check whether contract code is present at `address`.
async fn is_contract_deployed<P: Provider>(
    provider: &P,
    address: &Address,
) -> Result<bool, TransportError> {
    let bytes_fut = provider.get_code_at(*address).into_future();
    let bytes = traced!(
        bytes_fut,
        tracing::info_span!("get_code_at",
            address = %address,
            otel.kind = "client",
        )
    )?;
    Ok(!bytes.is_empty())
}

impl<P> TokenReader for Eip155TokenReader<P>
where
    P: Provider + 'static,
{
    fn read_token(&self, address: Address) -> BoxFuture<'_, TokenLookup> {
        Box::pin(self.lookup(address))
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Bytes, U256, address};
    use alloy_provider::ProviderBuilder;
    use alloy_sol_types::SolCall;
    use alloy_transport::mock::Asserter;

    use super::*;
    use crate::contract::IERC20Metadata::{decimalsCall, nameCall, symbolCall, totalSupplyCall};

    const TOKEN: Address = address!("F574D0c40D3f520360882ee9Eabc718cF6AEA339");

    fn reader(asserter: &Asserter) -> Eip155TokenReader<impl Provider + use<>> {
        Eip155TokenReader::new(ProviderBuilder::default().connect_mocked_client(asserter.clone()))
    }

    fn push_code(asserter: &Asserter) {
        asserter.push_success(&Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]));
    }

    fn push_metadata(asserter: &Asserter, name: &str, symbol: &str, supply: U256, decimals: u8) {
        asserter.push_success(&Bytes::from(nameCall::abi_encode_returns(&name.to_owned())));
        asserter.push_success(&Bytes::from(symbolCall::abi_encode_returns(&symbol.to_owned())));
        asserter.push_success(&Bytes::from(totalSupplyCall::abi_encode_returns(&supply)));
        asserter.push_success(&Bytes::from(decimalsCall::abi_encode_returns(&decimals)));
    }

    #[tokio::test]
    async fn test_reads_conforming_token() {
        let asserter = Asserter::new();
        push_code(&asserter);
        let supply: U256 = "1000000000000000000".parse().unwrap();
        push_metadata(&asserter, "Token B", "TKB", supply, 18);

        let info = reader(&asserter).fetch_token(TOKEN).await.unwrap();

        assert_eq!(info.address(), TOKEN);
        assert_eq!(info.name(), "Token B");
        assert_eq!(info.symbol(), "TKB");
        assert_eq!(info.total_supply(), supply);
        assert_eq!(info.decimals(), 18);
    }

    #[tokio::test]
    async fn test_account_without_code_is_not_found() {
        let asserter = Asserter::new();
        asserter.push_success(&Bytes::new());

        let lookup = reader(&asserter).lookup(TOKEN).await;

        assert_eq!(lookup, TokenLookup::NotFound);
    }

    #[tokio::test]
    async fn test_reverting_calls_are_not_conforming() {
        let asserter = Asserter::new();
        push_code(&asserter);
        for _ in 0..4 {
            asserter.push_failure_msg("execution reverted");
        }

        let lookup = reader(&asserter).lookup(TOKEN).await;

        assert!(matches!(lookup, TokenLookup::NotConforming(_)), "{lookup:?}");
    }

    #[tokio::test]
    async fn test_single_failing_call_is_not_conforming() {
        let asserter = Asserter::new();
        push_code(&asserter);
        asserter.push_success(&Bytes::from(nameCall::abi_encode_returns(&"Token B".to_owned())));
        asserter.push_success(&Bytes::from(symbolCall::abi_encode_returns(&"TKB".to_owned())));
        asserter.push_success(&Bytes::from(totalSupplyCall::abi_encode_returns(&U256::from(1_u64))));
        asserter.push_failure_msg("execution reverted");

        let lookup = reader(&asserter).lookup(TOKEN).await;

        assert!(matches!(lookup, TokenLookup::NotConforming(_)), "{lookup:?}");
    }

    #[tokio::test]
    async fn test_empty_return_data_is_not_conforming() {
        let asserter = Asserter::new();
        push_code(&asserter);
        for _ in 0..4 {
            asserter.push_success(&Bytes::new());
        }

        let lookup = reader(&asserter).lookup(TOKEN).await;

        assert!(matches!(lookup, TokenLookup::NotConforming(_)), "{lookup:?}");
    }

    #[tokio::test]
    async fn test_empty_symbol_is_not_conforming() {
        let asserter = Asserter::new();
        push_code(&asserter);
        push_metadata(&asserter, "Token B", "", U256::from(1_u64), 18);

        let lookup = reader(&asserter).lookup(TOKEN).await;

        assert_eq!(
            lookup,
            TokenLookup::NotConforming("contract returned an empty symbol".to_owned())
        );
    }

    #[tokio::test]
    async fn test_unreachable_node_is_upstream() {
        let asserter = Asserter::new();

        let lookup = reader(&asserter).lookup(TOKEN).await;

        assert!(matches!(lookup, TokenLookup::Upstream(_)), "{lookup:?}");
    }

    #[tokio::test]
    async fn test_read_token_through_trait_object() {
        let asserter = Asserter::new();
        asserter.push_success(&Bytes::new());
        let boxed: Box<dyn TokenReader> = Box::new(reader(&asserter));

        assert_eq!(boxed.read_token(TOKEN).await, TokenLookup::NotFound);
    }
}

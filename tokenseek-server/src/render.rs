//! Plain-text rendering for the `search` subcommand.

use tokenseek::TokenDescriptor;

/// Message printed when a search yields nothing.
pub const NO_TOKENS_FOUND: &str = "No tokens found";

/// Renders descriptors as text cards separated by blank lines.
#[must_use]
pub fn render_cards(tokens: &[TokenDescriptor]) -> String {
    if tokens.is_empty() {
        return format!("{NO_TOKENS_FOUND}\n");
    }
    tokens
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders one descriptor.
#[must_use]
pub fn render_card(token: &TokenDescriptor) -> String {
    format!(
        "{} ({})\n  Address:      {}\n  Total supply: {} ({})\n  Decimals:     {}\n  Source:       {}\n",
        token.name(),
        token.symbol(),
        token.address(),
        token.total_supply_formatted(),
        token.total_supply(),
        token.decimals(),
        token.source(),
    )
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{U256, address};
    use tokenseek::{TokenInfo, TokenSource};

    use super::*;

    fn token_b() -> TokenDescriptor {
        TokenInfo::new(
            address!("F574D0c40D3f520360882ee9Eabc718cF6AEA339"),
            "Token B".to_owned(),
            "TKB".to_owned(),
            U256::from(1_500_000_u64),
            6,
        )
        .unwrap()
        .into_descriptor(TokenSource::Blockchain)
    }

    #[test]
    fn test_empty_result() {
        assert_eq!(render_cards(&[]), "No tokens found\n");
    }

    #[test]
    fn test_card_layout() {
        assert_eq!(
            render_card(&token_b()),
            "Token B (TKB)\n\
             \x20 Address:      0xf574d0c40d3f520360882ee9eabc718cf6aea339\n\
             \x20 Total supply: 1.5 (1500000)\n\
             \x20 Decimals:     6\n\
             \x20 Source:       blockchain\n"
        );
    }

    #[test]
    fn test_cards_are_separated() {
        let rendered = render_cards(&[token_b(), token_b()]);
        assert_eq!(rendered.matches("Token B (TKB)").count(), 2);
        assert!(rendered.contains("blockchain\n\nToken B"));
    }
}

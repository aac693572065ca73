//! Query classification.
//!
//! A query is either a contract address or a free-text name fragment. The
//! distinction is purely syntactic and never touches the network.

use std::fmt;

use alloy_primitives::Address;

/// A classified search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// `0x` followed by exactly 40 hex digits, in any letter case.
    Address(Address),
    /// Anything else; matched as a case-insensitive substring.
    Name(String),
}

impl Query {
    /// Classifies a raw query string.
    ///
    /// Mixed-case addresses are accepted without checksum validation.
    ///
    /// ```
    /// use tokenseek::query::Query;
    ///
    /// assert!(matches!(
    ///     Query::parse("0xF574D0c40D3f520360882ee9Eabc718cF6AEA339"),
    ///     Query::Address(_)
    /// ));
    /// assert_eq!(Query::parse("Token B"), Query::Name("Token B".into()));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        parse_address(raw).map_or_else(|| Self::Name(raw.to_owned()), Self::Address)
    }

    /// Returns `true` for an address query.
    #[must_use]
    pub const fn is_address(&self) -> bool {
        matches!(self, Self::Address(_))
    }

    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Name(_) => "name",
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{address}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Parses a `0x`-prefixed, 40-hex-digit address.
///
/// Returns `None` for anything else, including unprefixed hex.
#[must_use]
pub fn parse_address(raw: &str) -> Option<Address> {
    let digits = raw.strip_prefix("0x")?;
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn test_mixed_case_address_is_address_query() {
        let query = Query::parse("0xF574D0c40D3f520360882ee9Eabc718cF6AEA339");
        assert_eq!(
            query,
            Query::Address(address!("f574d0c40d3f520360882ee9eabc718cf6aea339"))
        );
    }

    #[test]
    fn test_lower_and_upper_case_addresses() {
        assert!(Query::parse("0xf574d0c40d3f520360882ee9eabc718cf6aea339").is_address());
        assert!(Query::parse("0xF574D0C40D3F520360882EE9EABC718CF6AEA339").is_address());
    }

    #[test]
    fn test_name_query() {
        assert_eq!(Query::parse("Token B"), Query::Name("Token B".to_owned()));
        assert_eq!(Query::parse("usdc").kind(), "name");
    }

    #[test]
    fn test_near_addresses_are_names() {
        // 39 digits
        assert!(!Query::parse("0xf574d0c40d3f520360882ee9eabc718cf6aea33").is_address());
        // 41 digits
        assert!(!Query::parse("0xf574d0c40d3f520360882ee9eabc718cf6aea3390").is_address());
        // missing prefix
        assert!(!Query::parse("f574d0c40d3f520360882ee9eabc718cf6aea339").is_address());
        // non-hex digit
        assert!(!Query::parse("0xg574d0c40d3f520360882ee9eabc718cf6aea339").is_address());
        // surrounding whitespace
        assert!(!Query::parse(" 0xf574d0c40d3f520360882ee9eabc718cf6aea339").is_address());
    }
}

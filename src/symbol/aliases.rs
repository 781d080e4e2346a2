//! Built-in alias and index-name tables.

use std::{collections::HashMap, sync::LazyLock};

/// Shorthand → canonical symbol.
///
/// Keys must be uppercase ASCII with single spaces; see [`alias_key`].
const ALIASES_RAW: &[(&str, &str)] = &[
    // domestic blue chips
    ("TCS", "TCS.NS"),
    ("RELIANCE", "RELIANCE.NS"),
    ("INFY", "INFY.NS"),
    ("INFOSYS", "INFY.NS"),
    ("HDFCBANK", "HDFCBANK.NS"),
    ("HDFC BANK", "HDFCBANK.NS"),
    ("ICICIBANK", "ICICIBANK.NS"),
    ("ICICI BANK", "ICICIBANK.NS"),
    ("SBIN", "SBIN.NS"),
    ("SBI", "SBIN.NS"),
    ("WIPRO", "WIPRO.NS"),
    ("BHARTIARTL", "BHARTIARTL.NS"),
    ("AIRTEL", "BHARTIARTL.NS"),
    ("ITC", "ITC.NS"),
    ("KOTAKBANK", "KOTAKBANK.NS"),
    ("LT", "LT.NS"),
    ("AXISBANK", "AXISBANK.NS"),
    ("HINDUNILVR", "HINDUNILVR.NS"),
    ("HUL", "HINDUNILVR.NS"),
    // indices
    ("NIFTY", "^NSEI"),
    ("NIFTY 50", "^NSEI"),
    ("NIFTY50", "^NSEI"),
    ("SENSEX", "^BSESN"),
    ("BSE SENSEX", "^BSESN"),
    ("BANKNIFTY", "^NSEBANK"),
    ("NIFTY BANK", "^NSEBANK"),
    // crypto shorthand
    ("BITCOIN", "BTC-USD"),
    ("BTC", "BTC-USD"),
    ("ETHEREUM", "ETH-USD"),
    ("ETH", "ETH-USD"),
];

/// Index symbol → display name, used by search.
const INDEX_NAMES_RAW: &[(&str, &str)] = &[
    ("^NSEI", "NIFTY 50"),
    ("^BSESN", "S&P BSE SENSEX"),
    ("^NSEBANK", "NIFTY BANK"),
];

/// Precomputed lookup table using `ALIASES_RAW`.
static ALIASES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIASES_RAW.iter().copied().collect());

static INDEX_NAMES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| INDEX_NAMES_RAW.iter().copied().collect());

/// Normalize user input into the table key form: uppercase ASCII, single spaces.
pub(crate) fn alias_key(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_ascii_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn builtin_alias(key: &str) -> Option<&'static str> {
    ALIASES.get(key).copied()
}

/// Display name of a well-known index symbol.
pub(crate) fn index_name(symbol: &str) -> Option<&'static str> {
    INDEX_NAMES.get(symbol).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_already_normalized() {
        for (k, _) in ALIASES_RAW {
            assert_eq!(alias_key(k), *k, "alias key {k:?} is not normalized");
        }
    }

    #[test]
    fn alias_key_collapses_whitespace() {
        assert_eq!(alias_key("  nifty   50 "), "NIFTY 50");
        assert_eq!(builtin_alias(&alias_key("nifty 50")), Some("^NSEI"));
        assert_eq!(index_name("^BSESN"), Some("S&P BSE SENSEX"));
    }
}

//! Helpers for inferring a quote currency from the symbol itself.

use std::{collections::HashMap, sync::LazyLock};

/// Exchange suffix → ISO 4217 currency code.
///
/// Keys include the leading dot and are uppercase.
const SUFFIX_TO_CURRENCY_RAW: &[(&str, &str)] = &[
    (".NS", "INR"),
    (".BO", "INR"),
    (".L", "GBP"),
    (".TO", "CAD"),
    (".V", "CAD"),
    (".AX", "AUD"),
    (".HK", "HKD"),
    (".T", "JPY"),
    (".SS", "CNY"),
    (".SZ", "CNY"),
    (".KS", "KRW"),
    (".SI", "SGD"),
    (".DE", "EUR"),
    (".F", "EUR"),
    (".PA", "EUR"),
    (".AS", "EUR"),
    (".MI", "EUR"),
    (".MC", "EUR"),
    (".SW", "CHF"),
    (".SA", "BRL"),
];

/// Index symbol → currency of its constituents.
const INDEX_TO_CURRENCY_RAW: &[(&str, &str)] = &[
    ("^NSEI", "INR"),
    ("^BSESN", "INR"),
    ("^NSEBANK", "INR"),
    ("^GSPC", "USD"),
    ("^DJI", "USD"),
    ("^IXIC", "USD"),
    ("^TNX", "USD"),
    ("^FTSE", "GBP"),
    ("^N225", "JPY"),
];

static SUFFIX_TO_CURRENCY: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| SUFFIX_TO_CURRENCY_RAW.iter().copied().collect());

static INDEX_TO_CURRENCY: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| INDEX_TO_CURRENCY_RAW.iter().copied().collect());

/// Best-effort currency for a canonical symbol.
///
/// Pairs like `BTC-USD` use their quote leg; unsuffixed tickers are assumed
/// to be US listings. Returns `None` for unknown suffixes and indices.
pub(crate) fn currency_for_symbol(symbol: &str) -> Option<&'static str> {
    if symbol.starts_with('^') {
        return INDEX_TO_CURRENCY.get(symbol).copied();
    }
    if let Some(idx) = symbol.rfind('.') {
        let suffix = symbol[idx..].to_ascii_uppercase();
        return SUFFIX_TO_CURRENCY.get(suffix.as_str()).copied();
    }
    if let Some((_, quote_leg)) = symbol.rsplit_once('-') {
        return match quote_leg {
            "USD" => Some("USD"),
            "INR" => Some("INR"),
            "EUR" => Some("EUR"),
            _ => None,
        };
    }
    if symbol.contains('=') {
        return None;
    }
    Some("USD")
}

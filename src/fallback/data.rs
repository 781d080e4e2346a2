//! Curated last-resort prices.
//!
//! Values are `(mantissa, scale)` pairs so they stay exact.

use crate::core::Category;

pub(super) struct Seed {
    pub(super) symbol: &'static str,
    pub(super) name: Option<&'static str>,
    pub(super) price: (i64, u32),
    pub(super) change: (i64, u32),
    pub(super) change_percent: (i64, u32),
}

const fn seed(
    symbol: &'static str,
    name: Option<&'static str>,
    price: (i64, u32),
    change: (i64, u32),
    change_percent: (i64, u32),
) -> Seed {
    Seed {
        symbol,
        name,
        price,
        change,
        change_percent,
    }
}

/// Date the curated values were captured.
pub(super) const AS_OF: (i32, u32, u32) = (2026, 1, 12);

/// Per-symbol fallback. Wins over category entries for the same symbol.
pub(super) const SYMBOL_SEEDS: &[Seed] = &[
    seed(
        "TCS.NS",
        Some("Tata Consultancy Services"),
        (385_050, 2),
        (12_550, 2),
        (336, 2),
    ),
    seed(
        "RELIANCE.NS",
        Some("Reliance Industries"),
        (289_530, 2),
        (9_580, 2),
        (341, 2),
    ),
    seed("AAPL", Some("Apple Inc."), (18_550, 2), (250, 2), (136, 2)),
];

/// Category backfill lists, in display order.
pub(super) const CATEGORY_SEEDS: &[(Category, &[Seed])] = &[
    (
        Category::Stock,
        &[
            seed("RELIANCE.NS", None, (2900, 0), (15, 0), (5, 1)),
            seed("TCS.NS", None, (3850, 0), (45, 0), (12, 1)),
            seed("HDFCBANK.NS", None, (1650, 0), (-5, 0), (-3, 1)),
            seed("SBIN.NS", None, (750, 0), (6, 0), (8, 1)),
            seed("ITC.NS", None, (435, 0), (1, 0), (2, 1)),
        ],
    ),
    (
        Category::Crypto,
        &[
            seed("BTC-USD", Some("Bitcoin USD"), (65_000, 0), (1500, 0), (25, 1)),
            seed("ETH-USD", Some("Ethereum USD"), (3500, 0), (60, 0), (18, 1)),
        ],
    ),
    (
        Category::Etf,
        &[
            seed("NIFTYBEES.NS", None, (240, 0), (1, 0), (4, 1)),
            seed("GOLDBEES.NS", None, (55, 0), (5, 2), (1, 1)),
            seed("SPY", None, (500, 0), (3, 0), (6, 1)),
        ],
    ),
    (
        Category::MutualFund,
        &[
            seed("^NSEI", Some("NIFTY 50"), (22_000, 0), (110, 0), (5, 1)),
            seed("^BSESN", Some("S&P BSE SENSEX"), (72_000, 0), (280, 0), (4, 1)),
        ],
    ),
    (
        Category::Bond,
        &[seed("^TNX", None, (42, 1), (0, 0), (0, 0))],
    ),
];

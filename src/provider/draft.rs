use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core::conversions::{f64_to_decimal, sanitize_price};
use crate::core::{Market, ProviderId, Quote, Source, Unavailable};
use crate::symbol::currency_for_symbol;

/// Raw values an adapter pulled out of a provider response, before sanitation.
///
/// [`finish`](Self::finish) is the single place where provider floats become
/// a [`Quote`]: the price must be finite and positive, and a missing change is
/// derived from the reference price.
#[derive(Debug, Clone)]
pub struct QuoteDraft {
    pub symbol: String,
    pub market: Market,
    pub price: Option<f64>,
    pub change: Option<f64>,
    /// Percent, `3.36` for +3.36%.
    pub change_percent: Option<f64>,
    /// Previous close or session open.
    pub reference_price: Option<f64>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub market_time: Option<DateTime<Utc>>,
}

impl QuoteDraft {
    #[must_use]
    pub fn new(symbol: impl Into<String>, market: Market) -> Self {
        Self {
            symbol: symbol.into(),
            market,
            price: None,
            change: None,
            change_percent: None,
            reference_price: None,
            name: None,
            currency: None,
            market_time: None,
        }
    }

    /// # Errors
    /// `MissingPrice` or `InvalidPrice` when the price is absent, non-finite or
    /// not strictly positive.
    pub fn finish(self, source: ProviderId) -> Result<Quote, Unavailable> {
        let price = sanitize_price(self.price)?;
        let reference = self
            .reference_price
            .and_then(f64_to_decimal)
            .filter(|r| *r > Decimal::ZERO);

        let change = self
            .change
            .and_then(f64_to_decimal)
            .or_else(|| reference.and_then(|r| price.checked_sub(r)))
            .unwrap_or(Decimal::ZERO);

        let change_percent = self
            .change_percent
            .and_then(f64_to_decimal)
            .or_else(|| {
                let base = reference
                    .or_else(|| price.checked_sub(change).filter(|b| *b > Decimal::ZERO))?;
                change
                    .checked_div(base)?
                    .checked_mul(Decimal::ONE_HUNDRED)
                    .map(|p| p.round_dp(2))
            })
            .unwrap_or(Decimal::ZERO);

        let currency = self
            .currency
            .filter(|c| !c.trim().is_empty())
            .or_else(|| currency_for_symbol(&self.symbol).map(str::to_string));

        Ok(Quote {
            symbol: self.symbol,
            market: self.market,
            price,
            change,
            change_percent,
            name: self.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            currency,
            source: Source::Provider(source),
            market_time: self.market_time,
            observed_at: Utc::now(),
        })
    }
}

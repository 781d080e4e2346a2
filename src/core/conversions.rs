//! Numeric and time conversions shared by the provider adapters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::core::error::Unavailable;

/// Convert a finite f64 into a `Decimal` with four decimal places.
///
/// Goes through a formatted string to avoid binary float artifacts; returns
/// `None` for NaN and infinities.
#[must_use]
pub fn f64_to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    let formatted = format!("{value:.4}");
    Decimal::from_str(&formatted).ok().map(|d| d.normalize())
}

/// Accept a raw provider price only if it is finite and strictly positive.
///
/// # Errors
/// `MissingPrice` when absent, `InvalidPrice` for NaN, infinities and values
/// that are zero or negative (also after rounding).
pub fn sanitize_price(value: Option<f64>) -> Result<Decimal, Unavailable> {
    let v = value.ok_or(Unavailable::MissingPrice)?;
    match f64_to_decimal(v) {
        Some(d) if d > Decimal::ZERO => Ok(d),
        _ => Err(Unavailable::InvalidPrice(v.to_string())),
    }
}

/// Parse the number formats providers put in strings: `"3,850.50"`,
/// `"+125.50"`, `" 0.75 "`. Blank strings and `"-"` yield `None`.
#[must_use]
pub fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '+')
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a percent string such as `"+3.36%"` or `"-0.3 %"` into `3.36` / `-0.3`.
#[must_use]
pub fn parse_percent(s: &str) -> Option<f64> {
    parse_number(s.trim().trim_end_matches('%'))
}

/// Unix seconds to a UTC timestamp. Zero and negative epochs are treated as
/// "not reported".
#[must_use]
pub fn epoch_to_datetime(ts: i64) -> Option<DateTime<Utc>> {
    if ts <= 0 {
        return None;
    }
    DateTime::from_timestamp(ts, 0)
}

/// Parse provider date strings (`2026-01-12`, `2026-01-12 15:30:00`) as UTC.
#[must_use]
pub fn date_str_to_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

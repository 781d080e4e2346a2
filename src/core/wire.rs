use serde::{Deserialize, Deserializer};

use crate::core::conversions::parse_number;

/// Providers disagree on whether numbers are JSON numbers or strings
/// (sometimes comma-grouped). Accept both; anything unparseable becomes `None`.
pub(crate) fn de_f64_lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    #[allow(dead_code)]
    enum AnyNumber {
        F64(f64),
        Str(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<AnyNumber>::deserialize(deserializer)? {
        Some(AnyNumber::F64(f)) if f.is_finite() => Some(f),
        Some(AnyNumber::Str(s)) => parse_number(&s),
        _ => None,
    })
}

/// Same as [`de_f64_lenient`] for integer epochs sent either way.
pub(crate) fn de_i64_lenient<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    #[allow(dead_code)]
    enum AnyInt {
        I64(i64),
        Str(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<AnyInt>::deserialize(deserializer)? {
        Some(AnyInt::I64(i)) => Some(i),
        Some(AnyInt::Str(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

//! Lenient deserializers for numeric-or-missing form fields
//!
//! Stored and imported records may carry numbers as strings, nulls, or junk.
//! All of these deserialize to `None` rather than rejecting the document.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use super::equipment::MaintenanceLevel;

const YEAR_LIMIT: f64 = 9999.0;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextLike {
    Text(String),
    Other(IgnoredAny),
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberLike::deserialize(deserializer)? {
        NumberLike::Number(n) => Some(n),
        NumberLike::Text(s) => s.trim().parse::<f64>().ok(),
        NumberLike::Other(_) => None,
    };
    Ok(value.filter(|n| n.is_finite()))
}

/// Years outside a four-digit range are treated as missing
pub fn year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?
        .map(f64::trunc)
        .filter(|y| (-YEAR_LIMIT..=YEAR_LIMIT).contains(y))
        .map(|y| y as i32))
}

/// Derived amount; anything unreadable counts as zero
pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.unwrap_or(0.0))
}

pub fn maintenance_level<'de, D>(deserializer: D) -> Result<Option<MaintenanceLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextLike::deserialize(deserializer)? {
        TextLike::Text(s) => s.parse().ok(),
        TextLike::Other(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "number")]
        value: Option<f64>,
        #[serde(default, deserialize_with = "maintenance_level")]
        level: Option<MaintenanceLevel>,
        #[serde(default, deserialize_with = "year")]
        year: Option<i32>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_number_accepts_numbers_and_numeric_text() {
        assert_eq!(probe(r#"{"value": 12}"#).value, Some(12.0));
        assert_eq!(probe(r#"{"value": 2.5}"#).value, Some(2.5));
        assert_eq!(probe(r#"{"value": " 300 "}"#).value, Some(300.0));
    }

    #[test]
    fn test_number_coerces_junk_to_missing() {
        assert_eq!(probe(r#"{"value": "abc"}"#).value, None);
        assert_eq!(probe(r#"{"value": null}"#).value, None);
        assert_eq!(probe(r#"{"value": [1, 2]}"#).value, None);
        assert_eq!(probe(r#"{"value": "NaN"}"#).value, None);
        assert_eq!(probe("{}").value, None);
    }

    #[test]
    fn test_year_out_of_range_is_missing() {
        assert_eq!(probe(r#"{"year": 2019.7}"#).year, Some(2019));
        assert_eq!(probe(r#"{"year": "1998"}"#).year, Some(1998));
        assert_eq!(probe(r#"{"year": -1e20}"#).year, None);
        assert_eq!(probe(r#"{"year": 1e12}"#).year, None);
    }

    #[test]
    fn test_maintenance_level_is_case_insensitive() {
        assert_eq!(
            probe(r#"{"level": "Intense"}"#).level,
            Some(MaintenanceLevel::Intense)
        );
        assert_eq!(probe(r#"{"level": "extreme"}"#).level, None);
        assert_eq!(probe(r#"{"level": 3}"#).level, None);
    }
}

//! Lenient timestamp input.
//!
//! Clients send either a full RFC 3339 instant or a bare calendar date
//! (`2024-01-15`), which is read as midnight UTC.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::CoreError;
use crate::types::Timestamp;

pub fn parse_timestamp(input: &str) -> Result<Timestamp, CoreError> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid date '{input}': expected RFC 3339 timestamp or YYYY-MM-DD"
            ))
        })
}

/// `#[serde(deserialize_with = "...")]` for a required lenient timestamp.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Same as [`deserialize_timestamp`] for optional fields. Pair with `#[serde(default)]`.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[test]
    fn accepts_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(ts, "2024-01-15T08:30:00Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn bare_date_is_midnight_utc() {
        let ts = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(ts, "2024-01-15T00:00:00Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn garbage_is_a_validation_error() {
        assert!(matches!(
            parse_timestamp("next tuesday"),
            Err(CoreError::Validation(_))
        ));
    }

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
        at: Option<Timestamp>,
    }

    #[test]
    fn optional_field_accepts_missing_null_and_date() {
        let missing: Body = serde_json::from_str("{}").unwrap();
        assert!(missing.at.is_none());
        let null: Body = serde_json::from_str(r#"{"at":null}"#).unwrap();
        assert!(null.at.is_none());
        let date: Body = serde_json::from_str(r#"{"at":"2024-01-15"}"#).unwrap();
        assert!(date.at.is_some());
        assert!(serde_json::from_str::<Body>(r#"{"at":"nope"}"#).is_err());
    }
}

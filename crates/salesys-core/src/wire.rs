//! # Wire Formats
//!
//! serde adapters for the formats the backend speaks.
//!
//! ```text
//!   in memory                         on the wire
//!   ─────────                         ───────────
//!   Money(2958)        ◄──────►       29.58
//!   NaiveDateTime      ◄──────►       "2024-03-01 14:05:09"
//! ```
//!
//! Use with `#[serde(with = "crate::wire::money")]` and
//! `#[serde(with = "crate::wire::timestamp")]`.

/// Format of every timestamp exchanged with the backend.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Money as a two-decimal number.
pub mod money {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::money::Money;

    pub fn serialize<S>(value: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.to_decimal())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom("amount is not a finite number"));
        }
        Ok(Money::from_decimal(value))
    }
}

/// `NaiveDateTime` as `"%Y-%m-%d %H:%M:%S"`.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Formats a timestamp the way the backend expects date-range arguments.
pub fn format_timestamp(date: &chrono::NaiveDateTime) -> String {
    date.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use crate::money::Money;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        #[serde(with = "super::money")]
        amount: Money,
        #[serde(with = "super::timestamp")]
        at: chrono::NaiveDateTime,
    }

    #[test]
    fn test_row_to_wire() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        let row = Row {
            amount: Money::from_cents(2958),
            at,
        };

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value, json!({"amount": 29.58, "at": "2024-03-01 09:05:00"}));
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        let raw = json!({"amount": 1.0, "at": "2024-03-01T09:05:00Z"});
        assert!(serde_json::from_value::<Row>(raw).is_err());
    }

    #[test]
    fn test_integer_amount_accepted() {
        let raw = json!({"amount": 10, "at": "2024-03-01 09:05:00"});
        let row: Row = serde_json::from_value(raw).unwrap();
        assert_eq!(row.amount.cents(), 1000);
    }
}

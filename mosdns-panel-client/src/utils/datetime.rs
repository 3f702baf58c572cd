//! Timestamp (de)serialization for panel API payloads.
//!
//! Current mosdns-panel builds report times as RFC3339 strings, but builds
//! from before the API rework sent raw Unix epochs, sometimes in seconds and
//! sometimes in milliseconds. Fields tagged with this module accept all three
//! wire shapes and always serialize back out as RFC3339.
//!
//! Usage: `#[serde(with = "crate::utils::datetime")]` on `DateTime<Utc>`
//! fields, `#[serde(with = "crate::utils::datetime::option")]` on
//! `Option<DateTime<Utc>>` fields.

use chrono::{DateTime, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serializer};

/// Every timestamp shape the backend has ever produced.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireStamp {
    Rfc3339(String),
    Signed(i64),
    Unsigned(u64),
}

impl WireStamp {
    /// Resolves the wire value into a UTC instant.
    fn resolve(self) -> Result<DateTime<Utc>, String> {
        match self {
            Self::Rfc3339(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("invalid RFC3339 timestamp: {e}")),
            Self::Signed(ts) => from_epoch(ts),
            // Wrapping cast; real timestamps never get near i64::MAX.
            Self::Unsigned(ts) => from_epoch(ts.cast_signed()),
        }
    }
}

/// Converts a raw epoch into `DateTime<Utc>`, guessing the unit.
///
/// Anything above 10^11 cannot be a second count before the year 5138, so
/// such values are read as milliseconds.
fn from_epoch(ts: i64) -> Result<DateTime<Utc>, String> {
    let parsed = if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    };
    parsed.ok_or_else(|| format!("epoch {ts} out of range"))
}

/// Serializes `DateTime<Utc>` as an RFC3339 string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

/// Deserializes `DateTime<Utc>` from any supported wire shape.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    WireStamp::deserialize(deserializer)?
        .resolve()
        .map_err(DeError::custom)
}

/// Same rules for `Option<DateTime<Utc>>`; `null` and absent stay `None`.
pub mod option {
    use super::*;

    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<WireStamp>::deserialize(deserializer)?
            .map(|stamp| stamp.resolve().map_err(DeError::custom))
            .transpose()
    }
}

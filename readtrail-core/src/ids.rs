//! Identifier and timestamp sources.
//!
//! Timestamps are persisted as RFC 3339 UTC strings with millisecond
//! precision and a `Z` suffix, so lexical order in SQL equals chronological
//! order. Every instant handed to the database is truncated to milliseconds
//! first, which keeps values equal across a write/read cycle.

use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use uuid::Uuid;

/// Generate an opaque book id (`book_<uuid>`).
pub fn new_book_id() -> String {
    format!("book_{}", Uuid::new_v4().simple())
}

/// Generate an opaque progress entry id (`progress_<uuid>`).
pub fn new_progress_id() -> String {
    format!("progress_{}", Uuid::new_v4().simple())
}

/// Current instant at storage precision.
pub fn now() -> DateTime<Utc> {
    normalize(Utc::now())
}

/// Truncate an instant to the precision the database keeps.
pub fn normalize(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(3)
}

/// Render an instant in the stored text format.
pub fn to_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Timestamp {
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// Serde adapter writing instants in the stored text format, for use with
/// `#[serde(with = "crate::ids::serde_timestamp")]`.
pub mod serde_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

//! Timestamp (de)serialization.
//!
//! The API emits either RFC 3339 timestamps or naive ISO-8601 date-times
//! without an offset. Naive values are read as UTC. Output is always RFC 3339.

use serde::{Deserialize, Deserializer, Serializer};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

const NAIVE: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

/// Parse an API timestamp, falling back to a naive UTC date-time.
pub fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(value) => Ok(value),
        Err(err) => PrimitiveDateTime::parse(raw, NAIVE)
            .map(PrimitiveDateTime::assume_utc)
            .map_err(|_| err),
    }
}

pub fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    let text = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

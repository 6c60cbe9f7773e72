use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Instant carried on the wire as whole epoch seconds.
///
/// Serializes as a bare integer. Deserializes from an integer or from a quoted
/// integer string, since some endpoints quote the `created` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub DateTime<Utc>);

impl Time {
    /// Instant `secs` seconds after the Unix epoch, or `None` when out of range
    pub fn from_unix(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Time)
    }

    pub fn unix(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Time {
    fn default() -> Self {
        Time(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(value: DateTime<Utc>) -> Self {
        Time(value)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.unix())
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EpochVisitor)
    }
}

struct EpochVisitor;

impl EpochVisitor {
    fn build<E: de::Error>(secs: i64) -> Result<Time, E> {
        Time::from_unix(secs).ok_or_else(|| E::custom(format!("epoch seconds out of range: {secs}")))
    }
}

impl Visitor<'_> for EpochVisitor {
    type Value = Time;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("epoch seconds as an integer or a string of digits")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Time, E> {
        Self::build(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Time, E> {
        let secs = i64::try_from(v).map_err(|_| E::custom(format!("epoch seconds out of range: {v}")))?;
        Self::build(secs)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Time, E> {
        let secs = v
            .trim()
            .parse::<i64>()
            .map_err(|e| E::custom(format!("invalid epoch seconds {v:?}: {e}")))?;
        Self::build(secs)
    }
}

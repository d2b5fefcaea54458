//! Primitive value types shared across resources: Quantity, Time, MicroTime.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    #[error("invalid quantity {0:?}")]
    Quantity(String),
    #[error("invalid timestamp {input:?}: {reason}")]
    Time { input: String, reason: String },
}

// Decimal or binary SI suffix, or a decimal exponent.
static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[KMGTPE]i|[numkMGTPE]|[eE][+-]?[0-9]+)?$")
        .expect("quantity pattern compiles")
});

/// Fixed-point resource amount such as `100m`, `1Gi` or `2e3`.
/// Kept in its textual form so re-encoding reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity(String);

impl Quantity {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl FromStr for Quantity {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if QUANTITY_RE.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(PrimitiveError::Quantity(s.to_string()))
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, PrimitiveError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PrimitiveError::Time { input: s.to_string(), reason: e.to_string() })
}

/// RFC 3339 timestamp with second precision (`2006-01-02T15:04:05Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(DateTime<Utc>);

impl Time {
    /// Sub-second precision is dropped.
    pub fn new(dt: DateTime<Utc>) -> Self {
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> { self.0 }

    pub fn to_rfc3339(&self) -> String { self.0.to_rfc3339_opts(SecondsFormat::Secs, true) }
}

impl FromStr for Time {
    type Err = PrimitiveError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { parse_rfc3339(s).map(Self::new) }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_rfc3339()) }
}

/// RFC 3339 timestamp with microsecond precision (`2006-01-02T15:04:05.000000Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MicroTime(DateTime<Utc>);

impl MicroTime {
    /// Precision below one microsecond is dropped.
    pub fn new(dt: DateTime<Utc>) -> Self {
        let micros = dt.nanosecond() / 1_000 * 1_000;
        Self(dt.with_nanosecond(micros).unwrap_or(dt))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> { self.0 }

    pub fn to_rfc3339(&self) -> String { self.0.to_rfc3339_opts(SecondsFormat::Micros, true) }
}

impl FromStr for MicroTime {
    type Err = PrimitiveError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { parse_rfc3339(s).map(Self::new) }
}

impl fmt::Display for MicroTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_rfc3339()) }
}

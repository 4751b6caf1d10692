//! Filing and event times.
//!
//! Every time recorded by the stack is a whole-second UTC instant. Text
//! input must carry an explicit `Z`; offsets such as `+00:00` are refused
//! so that one instant has exactly one rendering in persisted state.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DaxError;

const RENDER_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Whole-second UTC instant. Serialized as `YYYY-MM-DDTHH:MM:SSZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current wall-clock second.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Wrap a chrono instant, dropping any fractional second.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self(instant.trunc_subsecs(0))
    }

    /// Read an RFC 3339 instant written in `Z` form.
    pub fn parse(text: &str) -> Result<Self, DaxError> {
        if !text.ends_with('Z') {
            return Err(DaxError::Serialization(format!(
                "{text:?} is not a Z-suffixed UTC time"
            )));
        }
        DateTime::parse_from_rfc3339(text)
            .map(|fixed| Self::from_utc(fixed.with_timezone(&Utc)))
            .map_err(|err| DaxError::Serialization(format!("bad time {text:?}: {err}")))
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Seconds since 1970-01-01T00:00:00Z.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn to_iso8601(&self) -> String {
        self.0.format(RENDER_FORMAT).to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(RENDER_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = DaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = DaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_iso8601()
    }
}

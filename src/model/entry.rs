//! Log entry: one audited checkpoint decision.

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use serde::{Deserialize, Deserializer, Serialize, de};

use super::Intent;

/// A single record in the session log.
///
/// Written once per non-help checkpoint and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the instruction was accepted.
    ///
    /// Written as RFC 3339. Older logs hold local date-times without an
    /// offset; those are read in the system time zone.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: Timestamp,

    /// The classified intent.
    pub action: Intent,

    /// The instruction exactly as the human supplied it.
    pub user_input: String,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    pub fn now(action: Intent, user_input: impl Into<String>) -> Self {
        Self {
            timestamp: Timestamp::now(),
            action,
            user_input: user_input.into(),
        }
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(de::Error::custom)
}

fn parse_timestamp(raw: &str) -> Result<Timestamp, jiff::Error> {
    if let Ok(timestamp) = raw.parse::<Timestamp>() {
        return Ok(timestamp);
    }
    let local: DateTime = raw.parse()?;
    Ok(local.to_zoned(TimeZone::system())?.timestamp())
}

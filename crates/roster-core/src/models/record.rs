//! Registration record model

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Display format matching the en-US `toLocaleString` shape the site stores.
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// One registration entry.
///
/// Field names on the wire follow the documents the site already writes
/// (`name`, `pokemon`, `timestamp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// First and last name joined by a single space
    #[serde(rename = "name")]
    pub person_name: String,
    /// Selected option, or the free-text override
    #[serde(rename = "pokemon")]
    pub choice: String,
    /// Human-readable creation time from the client clock
    #[serde(rename = "timestamp")]
    pub created_at: String,
}

impl Record {
    /// Create a record with an explicit timestamp label
    #[must_use]
    pub fn new(
        person_name: impl Into<String>,
        choice: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            person_name: person_name.into(),
            choice: choice.into(),
            created_at: created_at.into(),
        }
    }
}

/// Format a timestamp the way records display it, e.g. `3/7/2024, 9:05:01 PM`.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

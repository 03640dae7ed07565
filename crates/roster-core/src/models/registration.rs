//! Registration form input and its validation into a [`Record`].

use chrono::{DateTime, TimeZone};

use super::record::{format_timestamp, Record};
use crate::error::{Error, Result};

/// Choice value that defers to the free-text field.
pub const OTHER_CHOICE: &str = "other";

/// Raw input from the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub choice: String,
    pub other_choice: Option<String>,
}

impl RegistrationForm {
    /// Validate the form and build a complete record stamped with `at`.
    ///
    /// A record is only produced once every field checks out, so callers never
    /// observe a partially filled entry.
    pub fn into_record<Tz: TimeZone>(self, at: &DateTime<Tz>) -> Result<Record>
    where
        Tz::Offset: std::fmt::Display,
    {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let choice = self.choice.trim();

        if first_name.is_empty() || last_name.is_empty() || choice.is_empty() {
            return Err(Error::InvalidInput("Please fill in all fields".to_string()));
        }

        let final_choice = if choice == OTHER_CHOICE {
            let other = self.other_choice.as_deref().map_or("", str::trim);
            if other.is_empty() {
                return Err(Error::InvalidInput(
                    "Please specify your favorite Pokemon".to_string(),
                ));
            }
            other
        } else {
            choice
        };

        Ok(Record::new(
            format!("{first_name} {last_name}"),
            final_choice,
            format_timestamp(at),
        ))
    }
}

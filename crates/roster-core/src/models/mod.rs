//! Data models for Roster

mod record;
mod registration;

pub use record::{format_timestamp, Record};
pub use registration::{RegistrationForm, OTHER_CHOICE};

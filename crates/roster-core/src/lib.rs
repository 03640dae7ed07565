//! roster-core - Core library for Roster
//!
//! This crate contains the registration record model, the persistence layer
//! that reconciles submissions with a remote GitHub document (falling back to
//! a local slot), and the submission list presentation used by every Roster
//! interface.

pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod storage;
pub mod store;
pub mod util;
pub mod view;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use models::{Record, RegistrationForm};
pub use store::{Loaded, Persistence, RecordStore};
pub use view::{Announcement, RowRef, SubmissionView};

pub mod add;
pub mod common;
pub mod delete;
pub mod list;
pub mod status;

//! Local fallback storage for submissions.
//!
//! A fallback store holds named slots of serialized text. The record store
//! keeps the whole submission list in a single slot and reads or writes it
//! whenever the remote document is unconfigured or unreachable.

mod file;
mod memory;

pub use file::FileFallbackStore;
pub use memory::MemoryFallbackStore;

use crate::Result;

/// Key-value slot storage used when remote persistence is unavailable.
pub trait FallbackStore: Send + Sync {
    /// Read a slot, returning `None` when nothing has been stored yet.
    fn read_slot(&self, slot: &str) -> Result<Option<String>>;

    /// Replace the contents of a slot.
    fn write_slot(&self, slot: &str, value: &str) -> Result<()>;
}

//! In-memory fallback store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::FallbackStore;
use crate::{Error, Result};

/// Process-local fallback store. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryFallbackStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryFallbackStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| Error::Storage("fallback slot lock poisoned".to_string()))
    }
}

impl FallbackStore for MemoryFallbackStore {
    fn read_slot(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.slots()?.get(slot).cloned())
    }

    fn write_slot(&self, slot: &str, value: &str) -> Result<()> {
        self.slots()?.insert(slot.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_slots() {
        let store = MemoryFallbackStore::new();
        let other = store.clone();

        store.write_slot("slot", "value").unwrap();
        assert_eq!(other.read_slot("slot").unwrap().as_deref(), Some("value"));
        assert_eq!(other.read_slot("missing").unwrap(), None);
    }
}

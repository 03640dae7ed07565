//! File-backed fallback store: one `<slot>.json` file per slot.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::FallbackStore;
use crate::{Error, Result};

/// Fallback store rooted at a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFallbackStore {
    dir: PathBuf,
}

impl FileFallbackStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `slot`.
    pub fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        let slot = normalize_slot_name(slot)?;
        Ok(self.dir.join(format!("{slot}.json")))
    }
}

impl FallbackStore for FileFallbackStore {
    fn read_slot(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(Error::Storage(format!(
                "Failed to read {}: {error}",
                path.display()
            ))),
        }
    }

    fn write_slot(&self, slot: &str, value: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        fs::create_dir_all(&self.dir).map_err(|error| {
            Error::Storage(format!(
                "Failed to create data directory {}: {error}",
                self.dir.display()
            ))
        })?;

        // Write beside the target and rename so readers never see a torn slot.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).map_err(|error| {
            Error::Storage(format!("Failed to write {}: {error}", staging.display()))
        })?;
        fs::rename(&staging, &path).map_err(|error| {
            Error::Storage(format!("Failed to replace {}: {error}", path.display()))
        })
    }
}

fn normalize_slot_name(slot: &str) -> Result<String> {
    let slot = slot.trim();
    if slot.is_empty() {
        return Err(Error::InvalidInput(
            "Fallback slot name cannot be empty".to_string(),
        ));
    }
    if !slot
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(Error::InvalidInput(format!(
            "Fallback slot name '{slot}' may only contain letters, digits, '-' and '_'"
        )));
    }
    Ok(slot.to_string())
}

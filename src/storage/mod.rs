//! # Storage Module
//!
//! JSON snapshot persistence for the garden and reminder sets, plus the
//! on-disk image cache. Two independent snapshot files back the in-memory
//! state; each is rewritten in full on every change.
//!
//! Writes are best-effort: a failed save is logged by the caller and
//! otherwise ignored, and in-memory state stays authoritative for the
//! session. Loads tolerate missing or unreadable files by returning an
//! empty set.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Added the images directory for generated plant portraits
//! - 1.0.0: Initial creation with garden and reminder snapshots

use anyhow::{Context as _, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot file holding the serialized Plant list.
pub const GARDEN_SNAPSHOT: &str = "my_garden.json";

/// Snapshot file holding the serialized Reminder list.
pub const REMINDER_SNAPSHOT: &str = "reminders.json";

/// File-backed snapshot store rooted at the configured data directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory for generated plant portraits.
    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join("images")
    }

    /// Load a snapshot, returning an empty set when the file is missing or
    /// unreadable. A corrupt snapshot is reported once and then ignored.
    pub fn load<T: DeserializeOwned>(&self, file: &str) -> Vec<T> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read snapshot {}: {e}", path.display());
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(e) => {
                warn!("Ignoring corrupt snapshot {}: {e}", path.display());
                Vec::new()
            }
        }
    }

    /// Serialize and write a snapshot. Callers treat failures as non-fatal.
    pub fn save<T: Serialize>(&self, file: &str, items: &[T]) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("creating data dir {}", self.data_dir.display()))?;
        let path = self.data_dir.join(file);
        let content = serde_json::to_string_pretty(items)?;
        fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Write image bytes into the image cache and return the stored path.
    pub fn save_image(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let dir = self.images_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating image dir {}", dir.display()))?;
        let path = dir.join(filename);
        fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Entry {
        name: String,
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let entries: Vec<Entry> = store.load("missing.json");
        assert!(entries.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let entries = vec![Entry {
            name: "Tulsi".to_string(),
        }];
        store.save("entries.json", &entries).unwrap();

        let loaded: Vec<Entry> = store.load("entries.json");
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_load_corrupt_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let store = SnapshotStore::new(dir.path());

        let entries: Vec<Entry> = store.load("bad.json");
        assert!(entries.is_empty());
    }

    #[test]
    fn test_save_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let store = SnapshotStore::new(&nested);

        store.save::<Entry>("entries.json", &[]).unwrap();
        assert!(nested.join("entries.json").exists());
    }

    #[test]
    fn test_save_image_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let path = store.save_image("rose.png", &[0x89, 0x50]).unwrap();
        assert!(path.exists());
        assert!(path.starts_with(store.images_dir()));
    }
}

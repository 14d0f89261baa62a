//! File-backed storage backend.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{StorageBackend, StorageError, check_quota, footprint};

/// A single JSON object file holding every key of one scope.
///
/// Each call re-reads the file, so separate processes pointed at the same
/// path see each other's writes and race like browser tabs: the last write
/// wins. Writes land in a sibling temp file that is renamed into place, so a
/// reader never sees a half-written file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    /// Storage at `path` with no quota. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota: None,
        }
    }

    /// Storage at `path` that rejects writes past `quota` bytes.
    pub fn with_quota(path: impl Into<PathBuf>, quota: usize) -> Self {
        Self {
            path: path.into(),
            quota: Some(quota),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::Unavailable(e.to_string())),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    /// Load for a read-modify-write. A corrupt file is replaced rather than
    /// blocking every future write.
    fn load_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.load() {
            Err(StorageError::Corrupt(reason)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %reason,
                    "Discarding corrupt storage file"
                );
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        }

        let encoded = serde_json::to_string_pretty(entries)?;
        let tmp = self
            .path
            .with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        std::fs::write(&tmp, encoded).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            StorageError::Unavailable(e.to_string())
        })
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load_for_update()?;
        let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
        check_quota(
            key,
            footprint(entries.iter()),
            replaced,
            key.len() + value.len(),
            self.quota,
        )?;
        entries.insert(key.to_owned(), value.to_owned());
        self.save(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load_for_update()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.save(&BTreeMap::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("yrush-file-storage-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let storage = FileStorage::new(scratch_path("local_storage.json"));
        assert_eq!(storage.get_item("yrush_cart").unwrap(), None);
    }

    #[test]
    fn test_values_survive_a_new_handle() {
        let path = scratch_path("local_storage.json");
        FileStorage::new(&path).set_item("k", "[1,2]").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("k").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_last_write_wins_across_handles() {
        let path = scratch_path("local_storage.json");
        let tab_a = FileStorage::new(&path);
        let tab_b = FileStorage::new(&path);

        tab_a.set_item("yrush_cart", r#"{"CD-001":1}"#).unwrap();
        tab_b.set_item("yrush_cart", r#"{"DVD-001":4}"#).unwrap();

        assert_eq!(
            tab_a.get_item("yrush_cart").unwrap().as_deref(),
            Some(r#"{"DVD-001":4}"#)
        );
    }

    #[test]
    fn test_corrupt_file_fails_reads_but_not_writes() {
        let path = scratch_path("local_storage.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "this is not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get_item("k"),
            Err(StorageError::Corrupt(_))
        ));

        storage.set_item("k", "1").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_quota_rejects_and_keeps_file() {
        let path = scratch_path("local_storage.json");
        let storage = FileStorage::with_quota(&path, 8);
        storage.set_item("k", "1234").unwrap();
        assert!(storage.set_item("k", "123456789").is_err());
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("1234"));
    }
}

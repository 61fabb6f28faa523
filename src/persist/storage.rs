//! Durable key-value backends.

use super::error::PersistError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A byte-oriented key-value store the persistence middleware writes to.
pub trait KeyValueStore: Send + Sync {
    /// Read the bytes stored under `key`, `None` if absent.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError>;

    /// Replace whatever is stored under `key`.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PersistError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}

/// In-process storage, mostly useful for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PersistError> {
        self.entries.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// One file per key inside a directory.
///
/// Writes go to a uniquely named temporary file in the same directory that
/// is then renamed over the target, so a crash mid-write never leaves a
/// truncated value behind and concurrent writers of one key never share a
/// temporary file. The last rename wins.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| PersistError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Keys are restricted to a portable file-name
    /// alphabet so they can never escape the directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(PersistError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.state")))
    }
}

impl KeyValueStore for FileStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        let mut temp =
            tempfile::NamedTempFile::new_in(&self.dir).map_err(|source| PersistError::Io {
                path: self.dir.clone(),
                source,
            })?;
        temp.write_all(bytes)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|source| PersistError::Io {
                path: temp.path().to_path_buf(),
                source,
            })?;
        temp.persist(&path).map_err(|e| PersistError::Io {
            path: e.file.path().to_path_buf(),
            source: e.error,
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.read("k").unwrap().is_none());

        storage.write("k", b"v1").unwrap();
        storage.write("k", b"v2").unwrap();

        assert_eq!(storage.read("k").unwrap(), Some(b"v2".to_vec()));
        assert_eq!(storage.len(), 1);

        storage.remove("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested")).unwrap();

        assert!(storage.read("prefs").unwrap().is_none());
        storage.write("prefs", b"{}").unwrap();
        assert_eq!(storage.read("prefs").unwrap(), Some(b"{}".to_vec()));
        let leftovers: Vec<_> = fs::read_dir(storage.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("prefs.state")]);

        storage.remove("prefs").unwrap();
        storage.remove("prefs").unwrap();
        assert!(storage.read("prefs").unwrap().is_none());
    }

    #[test]
    fn file_storage_concurrent_writers_of_one_key_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        let failures: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8u8)
                .map(|writer| {
                    let storage = storage.clone();
                    scope.spawn(move || {
                        (0..100u8)
                            .filter(|round| {
                                let payload = vec![writer; 64 + usize::from(*round)];
                                storage.write("prefs", &payload).is_err()
                            })
                            .count()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(failures, 0);
        let stored = storage.read("prefs").unwrap().unwrap();
        assert!(stored.iter().all(|b| *b == stored[0]), "torn write: {stored:?}");
        assert_eq!(fs::read_dir(storage.dir()).unwrap().count(), 1);
    }

    #[test]
    fn file_storage_rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        for key in ["", "../etc", "a/b", ".hidden", "spa ce"] {
            assert!(
                matches!(storage.path_for(key), Err(PersistError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
        assert!(storage.path_for("app.settings-v2_x").is_ok());
    }
}

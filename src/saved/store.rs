use crate::error::{FinderError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tempfile::NamedTempFile;

/// Durable string key-value store used for the saved-set.
///
/// Calls are synchronous; a completed `write` is visible to every later
/// `read`, from any context sharing the store.
pub trait PersistenceAdapter: Send + Sync {
    /// Returns Ok(None) when the key was never written or was removed.
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store. Clones share the same map, so two managers built from
/// clones behave like two tabs over one local storage.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceAdapter for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| FinderError::Storage("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| FinderError::Storage("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| FinderError::Storage("memory store lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| storage_error(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PersistenceAdapter for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&path, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        // Each write gets its own temp file, then renames over the key's file,
        // so readers never see a partial file and concurrent writers never
        // share a temp path.
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| storage_error(&self.dir, e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| storage_error(tmp.path(), e))?;
        tmp.persist(&path).map_err(|e| storage_error(&path, e.error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&path, e)),
        }
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> FinderError {
    FinderError::Storage(format!("{}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let other_tab = store.clone();

        assert_eq!(store.read("k").unwrap(), None);
        store.write("k", "[1]").unwrap();
        assert_eq!(other_tab.read("k").unwrap().as_deref(), Some("[1]"));

        other_tab.remove("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested")).unwrap();

        assert_eq!(store.read("savedProperties").unwrap(), None);
        store.write("savedProperties", "[3,1]").unwrap();
        assert_eq!(store.read("savedProperties").unwrap().as_deref(), Some("[3,1]"));
        assert!(store.dir().join("savedProperties.json").exists());

        store.remove("savedProperties").unwrap();
        store.remove("savedProperties").unwrap();
        assert_eq!(store.read("savedProperties").unwrap(), None);
    }

    #[test]
    fn test_concurrent_file_writers_never_fail() {
        let dir = tempfile::tempdir().unwrap();
        let writers: Vec<_> = ["[1]", "[2]"]
            .into_iter()
            .map(|value| {
                let store = FileStore::open(dir.path()).unwrap();
                std::thread::spawn(move || {
                    let mut failures = 0;
                    for _ in 0..500 {
                        if store.write("savedProperties", value).is_err() {
                            failures += 1;
                        }
                        if let Some(read) = store.read("savedProperties").unwrap() {
                            assert!(read == "[1]" || read == "[2]", "partial read: {read:?}");
                        }
                    }
                    failures
                })
            })
            .collect();

        let failures: usize = writers.into_iter().map(|w| w.join().unwrap()).sum();
        assert_eq!(failures, 0);

        let last = store_value(dir.path());
        assert!(last == "[1]" || last == "[2]");
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    fn store_value(dir: &Path) -> String {
        FileStore::open(dir)
            .unwrap()
            .read("savedProperties")
            .unwrap()
            .unwrap()
    }
}

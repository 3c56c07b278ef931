//! Persistent store: one file per key under a cache directory.
//!
//! File names are the hex-encoded blake3 hash of the key, so arbitrary keys
//! (paths, slugs with slashes) map to flat, filesystem-safe names.

use super::KvStore;
use crate::log;
use parking_lot::Mutex;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Extension of cache entry files.
const ENTRY_EXT: &str = "entry";

#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    /// Serializes writers; readers go straight to disk.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let hash = blake3::hash(key.as_bytes());
        self.dir
            .join(hex::encode(hash.as_bytes()))
            .with_extension(ENTRY_EXT)
    }

    /// Number of entries on disk.
    pub fn len(&self) -> usize {
        fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .flatten()
                    .filter(|e| e.path().extension().is_some_and(|ext| ext == ENTRY_EXT))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.entry_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        let _guard = self.write_lock.lock();
        let path = self.entry_path(key);
        // Write-then-rename so readers never see a partial entry
        let tmp = path.with_extension("tmp");
        let result = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path));
        if let Err(err) = result {
            log!("cache"; "failed to persist `{key}`: {err}");
        }
    }

    fn remove(&self, key: &str) {
        let _guard = self.write_lock.lock();
        match fs::remove_file(self.entry_path(key)) {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                log!("cache"; "failed to remove `{key}`: {err}");
            }
            _ => {}
        }
    }

    fn clear(&self) {
        let _guard = self.write_lock.lock();
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == ENTRY_EXT) {
                fs::remove_file(&path).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("article_hello-world_v1", "Hello---World");
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get("article_hello-world_v1").as_deref(),
            Some("Hello---World")
        );
    }

    #[test]
    fn test_keys_with_slashes() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("/Projects/robot/index.html_desc_v1", "x");
        assert_eq!(store.get("/Projects/robot/index.html_desc_v1").as_deref(), Some("x"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_version_bump_misses() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("articles_manifest_v1", "[]");
        assert_eq!(store.get("articles_manifest_v2"), None);
    }

    #[test]
    fn test_clear_keeps_foreign_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("README"), "keep").unwrap();
        store.set("a", "1");
        store.set("b", "2");
        store.clear();
        assert!(store.is_empty());
        assert!(dir.path().join("README").exists());
    }

    #[test]
    fn test_remove_missing_is_silent() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.remove("never-written");
        assert!(store.is_empty());
    }
}

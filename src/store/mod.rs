//! Key-value storage backing the fetch cache and persisted UI settings.
//!
//! | Store         | Backing                      | Used by           |
//! |---------------|------------------------------|-------------------|
//! | `MemoryStore` | in-process hash map          | tests, `--no-cache` |
//! | `FileStore`   | one file per key on disk     | CLI builds        |
//!
//! Values are immutable once written under a versioned key, so stores give no
//! transactional guarantees: the last write for a key wins.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// String-keyed store shared across threads.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);

    /// Drop every entry.
    fn clear(&self);
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

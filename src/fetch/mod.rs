//! Cache-backed retrieval of site resources.
//!
//! ```text
//! CacheFetch::fetch(url, key)
//!     │
//!     ├── store.get(key) ──► hit  ──► decode stored text
//!     │
//!     └── miss ──► source.get(url) ──► store.set(key, text) ──► decode
//! ```
//!
//! Entries never expire by time. Bumping the version embedded in a
//! [`CacheKey`] forces a miss.

mod source;

pub use source::{FsSource, HttpSource, Source};

use crate::{error::FetchError, log, store::KvStore};
use serde_json::Value;
use std::{fmt, thread, time::Duration};

// ============================================================================
// Keys and payloads
// ============================================================================

/// Versioned cache key: `{kind}_{id}_{version}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(kind: &str, id: &str, version: &str) -> Self {
        Self(format!("{kind}_{id}_{version}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

/// Whether a URL names a JSON resource (query and fragment ignored).
pub fn is_json_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".json")
}

fn decode(url: &str, text: String) -> Result<Payload, FetchError> {
    if is_json_url(url) {
        serde_json::from_str(&text)
            .map(Payload::Json)
            .map_err(|source| FetchError::Json {
                url: url.to_owned(),
                source,
            })
    } else {
        Ok(Payload::Text(text))
    }
}

// ============================================================================
// CacheFetch
// ============================================================================

/// A [`Source`] fronted by a [`KvStore`].
pub struct CacheFetch<S, K> {
    source: S,
    store: K,
}

impl<S: Source, K: KvStore> CacheFetch<S, K> {
    pub const fn new(source: S, store: K) -> Self {
        Self { source, store }
    }

    pub const fn store(&self) -> &K {
        &self.store
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Fetch `url`, answering from the store when `key` is present.
    ///
    /// The stored entry is the raw text the source returned. Text that fails
    /// to decode is never stored.
    pub fn fetch(&self, url: &str, key: &CacheKey) -> Result<Payload, FetchError> {
        if let Some(cached) = self.store.get(key.as_str()) {
            log!("cache"; "hit {key}");
            return decode(url, cached);
        }

        let text = self.source.get(url)?;
        let payload = decode(url, text.clone())?;
        self.store.set(key.as_str(), &text);
        Ok(payload)
    }

    /// Fetch as text. JSON resources come back re-serialized.
    pub fn fetch_text(&self, url: &str, key: &CacheKey) -> Result<String, FetchError> {
        self.fetch(url, key).map(|payload| match payload {
            Payload::Text(text) => text,
            Payload::Json(value) => value.to_string(),
        })
    }

    /// Fetch with a fixed number of attempts and linear backoff.
    ///
    /// Attempt `n` (1-based) that fails waits `backoff * n` before the next
    /// one. After the last failure the error is logged and `None` returned.
    pub fn fetch_with_retry(
        &self,
        url: &str,
        key: &CacheKey,
        attempts: u32,
        backoff: Duration,
    ) -> Option<Payload> {
        let attempts = attempts.max(1);
        for attempt in 1..=attempts {
            match self.fetch(url, key) {
                Ok(payload) => return Some(payload),
                Err(err) if attempt < attempts => {
                    log!("fetch"; "attempt {attempt}/{attempts} for {url} failed: {err}");
                    thread::sleep(backoff * attempt);
                }
                Err(err) => {
                    log!("error"; "giving up on {url}: {err}");
                }
            }
        }
        None
    }

    /// Remove one entry, forcing the next fetch to hit the source.
    pub fn invalidate(&self, key: &CacheKey) {
        self.store.remove(key.as_str());
    }
}

// ============================================================================
// Tests
// ============================================================================

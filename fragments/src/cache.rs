//! Bounded, time-limited cache of fetched fragment bodies.
//!
//! Entries are keyed by fragment id and view format, so each conversion of a
//! fragment is cached on its own. The least recently used entry is evicted
//! once the capacity is reached, and entries older than the TTL are treated
//! as missing and dropped on lookup.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::debug;

use crate::view::ViewFormat;

/// Body cached in place of content that failed to load.
pub const LOAD_ERROR_CONTENT: &str = "Error loading fragment content";

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(capacity) => capacity,
    None => panic!("cache capacity must be non-zero"),
};

const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Cache sizing and staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct CacheConfig {
    /// Maximum number of cached bodies (default: 100).
    pub capacity: NonZeroUsize,
    /// Age after which an entry is stale (default: 30 minutes).
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl: DEFAULT_TTL,
        }
    }
}

#[derive(Debug)]
struct Entry {
    content: String,
    stored_at: Instant,
}

type Key = (String, ViewFormat);

/// Fetched fragment bodies by (fragment id, view format).
///
/// Not shared by itself; wrap it in a `Mutex` to use it from several tasks.
#[derive(Debug)]
pub struct FragmentContentCache {
    entries: LruCache<Key, Entry>,
    ttl: Duration,
}

impl Default for FragmentContentCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl FragmentContentCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: LruCache::new(config.capacity),
            ttl: config.ttl,
        }
    }

    /// Fresh content for `id` in `view`, marking it most recently used.
    pub fn get(&mut self, id: &str, view: ViewFormat) -> Option<&str> {
        self.get_at(id, view, Instant::now())
    }

    /// [`get`](Self::get) as of `now`.
    pub fn get_at(&mut self, id: &str, view: ViewFormat, now: Instant) -> Option<&str> {
        let key = (id.to_owned(), view);
        let stored_at = self.entries.peek(&key)?.stored_at;
        if now.saturating_duration_since(stored_at) >= self.ttl {
            debug!(fragment = id, view = %view, "cached content expired");
            self.entries.pop(&key);
            return None;
        }
        self.entries.get(&key).map(|entry| entry.content.as_str())
    }

    /// Cache `content` for `id` in `view`, replacing any previous entry.
    pub fn insert(&mut self, id: &str, view: ViewFormat, content: impl Into<String>) {
        self.insert_at(id, view, content, Instant::now());
    }

    /// [`insert`](Self::insert) as of `now`.
    pub fn insert_at(
        &mut self,
        id: &str,
        view: ViewFormat,
        content: impl Into<String>,
        now: Instant,
    ) {
        let entry = Entry {
            content: content.into(),
            stored_at: now,
        };
        if let Some(((evicted_id, evicted_view), _)) =
            self.entries.push((id.to_owned(), view), entry)
            && (evicted_id != id || evicted_view != view)
        {
            debug!(fragment = %evicted_id, view = %evicted_view, "evicted cached content");
        }
    }

    /// Remember that `id` failed to load in `view`, so it is not refetched until it expires.
    pub fn record_load_error(&mut self, id: &str, view: ViewFormat) {
        self.insert(id, view, LOAD_ERROR_CONTENT);
    }

    /// Drop every cached view of fragment `id`, returning how many were dropped.
    pub fn invalidate_fragment(&mut self, id: &str) -> usize {
        let keys: Vec<Key> = self
            .entries
            .iter()
            .filter(|((cached_id, _), _)| cached_id == id)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            self.entries.pop(key);
        }
        keys.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.entries.cap()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

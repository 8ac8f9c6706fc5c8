//! Bounded cache of rasterized symbol previews.
//!
//! Rendering a library symbol at preview scale is expensive enough to be
//! worth caching. Entries are keyed by component identity, hit only when the
//! requested dimensions match exactly, expire after a time-to-live, and are
//! evicted least-recently-used first once the cache is full.
//!
//! The cache is owned by the editing session and passed around explicitly;
//! hosts that share one cache between several editors pass the same instance.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::style::{CACHE_TTL_SECS, MAX_CACHE_SIZE};

/// A rasterized preview: tightly packed RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// A transparent bitmap of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Bitmap {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    bitmap: Bitmap,
    stamp: Instant,
    width: u32,
    height: u32,
}

/// LRU + TTL bounded preview cache.
#[derive(Debug)]
pub struct SymbolCache {
    entries: HashMap<String, CacheEntry>,
    /// Least-recently-used first.
    access_order: Vec<String>,
    capacity: usize,
    ttl: Duration,
}

impl Default for SymbolCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolCache {
    pub fn new() -> Self {
        Self::with_config(MAX_CACHE_SIZE, Duration::from_secs(CACHE_TTL_SECS))
    }

    pub fn with_config(capacity: usize, ttl: Duration) -> Self {
        SymbolCache {
            entries: HashMap::new(),
            access_order: Vec::new(),
            capacity,
            ttl,
        }
    }

    /// Cached bitmap for `id`, only if it is fresh and the dimensions match
    /// exactly. An expired entry is evicted as a side effect of the lookup.
    pub fn get(&mut self, id: &str, width: u32, height: u32) -> Option<&Bitmap> {
        let expired = match self.entries.get(id) {
            None => return None,
            Some(entry) => entry.stamp.elapsed() > self.ttl,
        };
        if expired {
            log::debug!("symbol cache: evicting expired entry {id}");
            self.entries.remove(id);
            self.remove_from_access_order(id);
            return None;
        }
        let entry = self.entries.get(id)?;
        if entry.width != width || entry.height != height {
            return None;
        }
        self.touch(id);
        self.entries.get(id).map(|e| &e.bitmap)
    }

    /// Insert or refresh an entry, evicting the least-recently-used one first
    /// if the cache is full and `id` is new.
    pub fn set(&mut self, id: &str, bitmap: Bitmap, width: u32, height: u32) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(id) {
            self.evict_lru();
        }
        self.entries.insert(
            id.to_string(),
            CacheEntry {
                bitmap,
                stamp: Instant::now(),
                width,
                height,
            },
        );
        self.touch(id);
    }

    /// Drop a single entry, e.g. when its source symbol changed.
    pub fn invalidate(&mut self, id: &str) {
        self.entries.remove(id);
        self.remove_from_access_order(id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.access_order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, id: &str) {
        self.remove_from_access_order(id);
        self.access_order.push(id.to_string());
    }

    fn remove_from_access_order(&mut self, id: &str) {
        if let Some(pos) = self.access_order.iter().position(|k| k == id) {
            self.access_order.remove(pos);
        }
    }

    fn evict_lru(&mut self) {
        if !self.access_order.is_empty() {
            let lru = self.access_order.remove(0);
            log::debug!("symbol cache: evicting least-recently-used entry {lru}");
            self.entries.remove(&lru);
        }
    }
}

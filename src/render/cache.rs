//! LRU caches used by the painter.
//!
//! Text measurement is the expensive call on a real canvas, and the same
//! `(font, text)` pairs come back every frame while scrolling.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::backend::Canvas;

/// A least-recently-used cache with a fixed capacity.
///
/// Lookups promote entries; when the cache is over capacity the entry that
/// was touched longest ago is evicted.
pub struct LruCache<K: Hash + Eq + Clone, V> {
    entries: HashMap<K, (V, u64)>,
    /// Recency tick -> key; the first entry is the eviction candidate
    order: BTreeMap<u64, K>,
    tick: u64,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Create a new cache with the given capacity.
    ///
    /// A capacity of 0 disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            tick: 0,
            capacity,
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Look up a value and mark it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.capacity == 0 {
            return None;
        }
        let tick = self.next_tick();
        let (_, stamp) = self.entries.get_mut(key)?;
        let old = std::mem::replace(stamp, tick);
        if let Some(k) = self.order.remove(&old) {
            self.order.insert(tick, k);
        }
        self.entries.get(key).map(|(v, _)| v)
    }

    /// Insert or replace a value. Returns `true` if the key was new.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let tick = self.next_tick();
        let is_new = match self.entries.insert(key.clone(), (value, tick)) {
            Some((_, old)) => {
                self.order.remove(&old);
                false
            }
            None => true,
        };
        self.order.insert(tick, key);
        self.enforce_cap();
        is_new
    }

    /// Check if a key is present without touching its recency.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Evict least recently used entries until we're at or below capacity.
    fn enforce_cap(&mut self) {
        while self.entries.len() > self.capacity {
            let Some((_, oldest)) = self.order.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }
}

/// Text widths keyed by `(font, text)`.
pub struct TextMeasureCache {
    widths: LruCache<(String, String), f64>,
}

impl TextMeasureCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            widths: LruCache::new(capacity),
        }
    }

    /// Width of `text` in `font`, measured on `canvas` only on a miss.
    pub fn measure(&mut self, canvas: &mut dyn Canvas, font: &str, text: &str) -> f64 {
        let key = (font.to_string(), text.to_string());
        if let Some(width) = self.widths.get(&key) {
            return *width;
        }
        let width = canvas.measure_text(text, font);
        self.widths.insert(key, width);
        width
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Drop every measurement, e.g. after a device pixel ratio change.
    pub fn clear(&mut self) {
        self.widths.clear();
    }
}

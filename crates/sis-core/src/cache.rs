//! Per-list page cache with generation isolation.
//!
//! Every entry belongs to the generation it was fetched under. Changing any
//! filter dimension starts a new generation and drops every entry at once, so
//! a lookup can never return rows fetched under an older filter.

use std::collections::HashMap;
use std::fmt;

/// Identifies one cache epoch: one (search, sort column, direction, page size) tuple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// The generation a fresh list starts in.
    pub const INITIAL: Self = Self(0);

    /// The generation following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Numeric id, for logging.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// One fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPage<T> {
    /// Rows of the page.
    pub rows: Vec<T>,
    /// Size of the whole filtered set when the page was fetched.
    pub total_count: usize,
}

/// Pages of one list, keyed by `(page_index, page_size)` within the active generation.
#[derive(Debug, Clone)]
pub struct PageCache<T> {
    generation: Generation,
    entries: HashMap<(usize, usize), CachedPage<T>>,
}

impl<T> Default for PageCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PageCache<T> {
    /// Empty cache in [`Generation::INITIAL`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: Generation::INITIAL,
            entries: HashMap::new(),
        }
    }

    /// The active generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Look up a page. Absent unless `generation` is the active one.
    #[must_use]
    pub fn get(
        &self,
        generation: Generation,
        page_index: usize,
        page_size: usize,
    ) -> Option<&CachedPage<T>> {
        if generation != self.generation {
            return None;
        }
        self.entries.get(&(page_index, page_size))
    }

    /// Whether a page is cached under `generation`.
    #[must_use]
    pub fn contains(&self, generation: Generation, page_index: usize, page_size: usize) -> bool {
        self.get(generation, page_index, page_size).is_some()
    }

    /// Store a page. Ignored (returns `false`) when `generation` is not the active one.
    pub fn put(
        &mut self,
        generation: Generation,
        page_index: usize,
        page_size: usize,
        page: CachedPage<T>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.entries.insert((page_index, page_size), page);
        true
    }

    /// Drop one page of the active generation.
    pub fn evict(&mut self, page_index: usize, page_size: usize) -> Option<CachedPage<T>> {
        self.entries.remove(&(page_index, page_size))
    }

    /// Drop every entry and start a new generation, which is returned.
    pub fn invalidate_all(&mut self) -> Generation {
        self.entries.clear();
        self.generation = self.generation.next();
        self.generation
    }

    /// Number of cached pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &[u32]) -> CachedPage<u32> {
        CachedPage {
            rows: rows.to_vec(),
            total_count: 23,
        }
    }

    #[test]
    fn test_put_and_get_in_active_generation() {
        let mut cache = PageCache::new();
        let generation = cache.generation();
        assert!(cache.put(generation, 0, 5, page(&[1, 2, 3])));
        assert_eq!(cache.get(generation, 0, 5).map(|p| p.rows.len()), Some(3));
        assert!(cache.get(generation, 0, 10).is_none());
        assert!(cache.get(generation, 1, 5).is_none());
    }

    #[test]
    fn test_invalidate_hides_old_generation() {
        let mut cache = PageCache::new();
        let old = cache.generation();
        cache.put(old, 0, 5, page(&[1]));

        let new = cache.invalidate_all();
        assert_ne!(old, new);
        assert!(cache.is_empty());
        assert!(cache.get(old, 0, 5).is_none());
        assert!(cache.get(new, 0, 5).is_none());
    }

    #[test]
    fn test_put_for_stale_generation_is_ignored() {
        let mut cache = PageCache::new();
        let old = cache.generation();
        let new = cache.invalidate_all();
        assert!(!cache.put(old, 0, 5, page(&[9])));
        assert!(cache.get(new, 0, 5).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_evict_single_page() {
        let mut cache = PageCache::new();
        let generation = cache.generation();
        cache.put(generation, 0, 5, page(&[1]));
        cache.put(generation, 1, 5, page(&[2]));
        assert!(cache.evict(0, 5).is_some());
        assert!(!cache.contains(generation, 0, 5));
        assert!(cache.contains(generation, 1, 5));
    }
}
